#![allow(dead_code)]

pub mod assertions;
pub mod config;
#[cfg(feature = "kraken")]
pub mod kraken;
