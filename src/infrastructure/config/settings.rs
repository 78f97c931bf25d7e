//! Configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional; an empty file yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use venuekit::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("venuekit.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [fill_tracker]
//! poll_interval_ms = 2000
//!
//! [deposit]
//! reservation_ttl_secs = 600
//!
//! [constraint_overrides."XLM/USD"]
//! volume_precision = 4
//! min_base_volume = "50"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::constraints::ConstraintOverrideConfig;
use super::logging::LoggingConfig;
use super::service::{DepositConfig, FillTrackerConfig};
use crate::domain::{OrderConstraintsOverride, TradingPair};
use crate::error::{ConfigError, Result};
use crate::port::Constrainable;

/// Main configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Fill tracker polling.
    pub fill_tracker: FillTrackerConfig,

    /// Deposit address acquisition.
    pub deposit: DepositConfig,

    /// Per-pair constraint overrides keyed by `"BASE/QUOTE"`.
    pub constraint_overrides: BTreeMap<String, ConstraintOverrideConfig>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.fill_tracker.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        for (key, over) in &self.constraint_overrides {
            parse_pair_key(key)?;
            over.validate()?;
        }

        Ok(())
    }

    /// Overrides as domain values, in key order.
    pub fn constraint_overrides(&self) -> Result<Vec<(TradingPair, OrderConstraintsOverride)>> {
        self.constraint_overrides
            .iter()
            .map(|(key, over)| -> Result<(TradingPair, OrderConstraintsOverride)> {
                Ok((parse_pair_key(key)?, over.to_override()?))
            })
            .collect()
    }

    /// Push every configured override into `venue`. Returns how many were
    /// applied.
    pub fn apply_constraint_overrides(&self, venue: &dyn Constrainable) -> Result<usize> {
        let overrides = self.constraint_overrides()?;
        for (pair, over) in &overrides {
            venue.override_order_constraints(pair, over);
            info!(pair = %pair, "Applied constraint override from config");
        }
        Ok(overrides.len())
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) -> bool {
        self.logging.init()
    }
}

fn parse_pair_key(key: &str) -> Result<TradingPair> {
    key.parse::<TradingPair>().map_err(|e| {
        ConfigError::InvalidValue {
            field: "constraint_overrides",
            reason: format!("'{key}': {e}"),
        }
        .into()
    })
}
