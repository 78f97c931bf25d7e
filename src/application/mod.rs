//! Application services.
//!
//! Venue-independent protocols built on the ports: response parsing, fill
//! tracking, deposit address acquisition, and the constraint table adapters
//! share.

pub mod constraints;
pub mod deposit;
pub mod fill_logger;
pub mod fill_tracker;
pub mod parser;
pub mod reservation;

pub use constraints::ConstraintsTable;
pub use deposit::{AddressAttempt, DepositManager, DepositSource};
pub use fill_logger::FillLogger;
pub use fill_tracker::{FillTracker, FillTrackerHandle, TrackerState, DEFAULT_POLL_INTERVAL};
pub use reservation::AddressReservations;
