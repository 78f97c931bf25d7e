//! Venuekit - Capability-composed trading venue toolkit.
//!
//! This crate lets strategy code talk to trading venues of unequal richness
//! through narrow capability traits, and provides the venue-independent
//! protocols that sit between them: fill tracking, deposit address
//! acquisition and tolerant parsing of untyped venue responses.
//!
//! # Architecture
//!
//! - **[`domain`]** - Value objects: [`Number`](domain::Number), assets,
//!   pairs, orders, trades, constraints, funding results
//! - **[`port`]** - Capability traits ([`Account`](port::Account),
//!   [`TradeApi`](port::TradeApi), [`DepositApi`](port::DepositApi), ...),
//!   the full [`Exchange`](port::Exchange), the reduced
//!   [`ExchangeShim`](port::ExchangeShim) and the
//!   [`RemoteQuery`](port::RemoteQuery) transport boundary
//! - **[`application`]** - [`FillTracker`](application::FillTracker),
//!   [`DepositManager`](application::DepositManager), the response
//!   [`parser`](application::parser) and the constraint table
//! - **[`adapter`]** - Kraken (feature `kraken`) and ledger offer converters
//! - **[`infrastructure`]** - TOML configuration and logging setup
//!
//! # Features
//!
//! - `kraken` (default) - Kraken venue adapter
//! - `testkit` - Scripted fakes for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use venuekit::application::{FillLogger, FillTracker};
//! use venuekit::domain::TradingPair;
//! use venuekit::infrastructure::config::Config;
//! use venuekit::port::FillTrackable;
//!
//! async fn track(venue: Arc<dyn FillTrackable>, config: &Config) -> venuekit::error::Result<()> {
//!     let mut tracker = FillTracker::new(
//!         TradingPair::new("XLM", "USD"),
//!         venue,
//!         config.fill_tracker.poll_interval(),
//!     );
//!     tracker.register_handler(Arc::new(FillLogger::new()))?;
//!     tracker.spawn().join().await
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
