//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`query`] - [`ScriptedQuery`], a scripted [`RemoteQuery`](crate::port::RemoteQuery)
//!   that records every call.
//! - [`venue`] - Capability-level fakes: [`ScriptedTradeFetcher`],
//!   [`RecordingHandler`], [`ScriptedDepositSource`], [`RecordingShim`].
//! - [`domain`] - Builders for domain primitives.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod query;
pub mod venue;

pub use query::ScriptedQuery;
pub use venue::{RecordingHandler, RecordingShim, ScriptedDepositSource, ScriptedTradeFetcher};
