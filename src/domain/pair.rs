//! Trading pair identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::asset::{Asset, AssetConverter};
use super::error::DomainError;

/// Ordered `(base, quote)` pair. Used as a map key across the crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: Asset,
    pub quote: Asset,
}

impl TradingPair {
    pub fn new(base: impl Into<Asset>, quote: impl Into<Asset>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Venue-native spelling, e.g. `XXBTZUSD` with an empty delimiter.
    pub fn to_venue_string(
        &self,
        converter: &AssetConverter,
        delimiter: &str,
    ) -> Result<String, DomainError> {
        Ok(format!(
            "{}{}{}",
            converter.to_venue(&self.base)?,
            delimiter,
            converter.to_venue(&self.quote)?
        ))
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidPair {
            value: s.to_string(),
        };
        let (base, quote) = s.split_once('/').ok_or_else(invalid)?;
        let base = Asset::try_new(base).map_err(|_| invalid())?;
        let quote = Asset::try_new(quote).map_err(|_| invalid())?;
        Ok(Self { base, quote })
    }
}
