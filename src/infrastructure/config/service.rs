//! Settings for the background protocols.

use std::time::Duration;

use serde::Deserialize;

use crate::application::AddressReservations;

/// Fill tracker settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FillTrackerConfig {
    /// Delay between trade-history polls.
    pub poll_interval_ms: u64,
}

impl FillTrackerConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for FillTrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
        }
    }
}

/// Deposit acquisition settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DepositConfig {
    /// How long a handed-out address stays reserved. 0 (the default)
    /// disables reservation.
    ///
    /// A reservation keeps concurrent callers off the same address, but a
    /// venue that keeps listing one unused address as fresh will then be
    /// asked to generate a new one for every call inside the TTL. Venues cap
    /// the number of addresses per asset, so enable this only where
    /// concurrent deposits for one asset actually happen.
    pub reservation_ttl_secs: u64,
}

impl DepositConfig {
    #[must_use]
    pub const fn reservation_ttl(&self) -> Duration {
        Duration::from_secs(self.reservation_ttl_secs)
    }

    /// Fresh reservation table with the configured TTL.
    #[must_use]
    pub fn reservations(&self) -> AddressReservations {
        AddressReservations::new(self.reservation_ttl())
    }
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            reservation_ttl_secs: 0,
        }
    }
}
