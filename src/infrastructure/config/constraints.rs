//! Operator overrides for venue order constraints.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::parser::NUMBER_PRECISION;
use crate::domain::{Number, OrderConstraintsOverride, MAX_PRECISION};
use crate::error::ConfigError;

/// One `[constraint_overrides."BASE/QUOTE"]` table.
///
/// Unset fields leave the venue's value in place. Volumes are decimals, as
/// strings or TOML numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintOverrideConfig {
    pub price_precision: Option<u32>,
    pub volume_precision: Option<u32>,
    pub min_base_volume: Option<Decimal>,
    pub min_quote_volume: Option<Decimal>,
}

impl ConstraintOverrideConfig {
    /// Check ranges without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, precision) in [
            ("price_precision", self.price_precision),
            ("volume_precision", self.volume_precision),
        ] {
            if precision.is_some_and(|p| p > MAX_PRECISION) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be at most {MAX_PRECISION}"),
                });
            }
        }
        for (field, volume) in [
            ("min_base_volume", self.min_base_volume),
            ("min_quote_volume", self.min_quote_volume),
        ] {
            if volume.is_some_and(|v| v.is_sign_negative()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be 0 or greater".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Domain override. Volumes take the override's volume precision when
    /// given, the parser precision otherwise.
    pub fn to_override(&self) -> Result<OrderConstraintsOverride, ConfigError> {
        self.validate()?;
        let precision = self.volume_precision.unwrap_or(NUMBER_PRECISION);
        let number = |field: &'static str, value: Decimal| {
            Number::new(value, precision).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })
        };

        Ok(OrderConstraintsOverride {
            price_precision: self.price_precision,
            volume_precision: self.volume_precision,
            min_base_volume: self
                .min_base_volume
                .map(|v| number("min_base_volume", v))
                .transpose()?,
            min_quote_volume: self
                .min_quote_volume
                .map(|v| number("min_quote_volume", v).map(Some))
                .transpose()?,
        })
    }
}
