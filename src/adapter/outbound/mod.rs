//! Outbound adapters (driven side).
//!
//! - [`ledger`] - Offer representations for ledger-settled venues
//! - `kraken` - Kraken exchange (feature `kraken`)

#[cfg(feature = "kraken")]
pub mod kraken;
pub mod ledger;
