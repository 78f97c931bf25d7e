//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::infrastructure::config::{Config, DepositConfig, FillTrackerConfig};

/// Fill tracker that polls every millisecond so loops turn over quickly.
pub fn fill_tracker() -> FillTrackerConfig {
    FillTrackerConfig {
        poll_interval_ms: 1,
    }
}

/// Deposit settings with the given reservation TTL.
pub fn deposit(reservation_ttl_secs: u64) -> DepositConfig {
    DepositConfig {
        reservation_ttl_secs,
    }
}

/// Defaults everywhere except a fast fill tracker.
pub fn fast() -> Config {
    Config {
        fill_tracker: fill_tracker(),
        ..Config::default()
    }
}
