//! Venue-agnostic asset identifiers and their venue-native spellings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Asset identifier - newtype over an upper-case currency or token code.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Asset(String);

impl Asset {
    /// Create a new `Asset`, normalising the code to upper case.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Create a new `Asset`, rejecting empty codes.
    pub fn try_new(code: impl AsRef<str>) -> Result<Self, DomainError> {
        let asset = Self::new(code);
        if asset.0.is_empty() {
            return Err(DomainError::EmptyAsset);
        }
        Ok(asset)
    }

    /// Get the asset code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Asset {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Asset {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Bidirectional table between [`Asset`]s and a venue's own symbols.
///
/// Owned by a venue adapter. Both directions fail loudly for entries the
/// venue does not list rather than guessing a spelling.
#[derive(Debug, Clone, Default)]
pub struct AssetConverter {
    to_venue: HashMap<Asset, String>,
    from_venue: HashMap<String, Asset>,
}

impl AssetConverter {
    /// Build a converter from `(asset, venue symbol)` entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Asset, S)>,
        S: Into<String>,
    {
        let mut converter = Self::default();
        for (asset, symbol) in entries {
            converter.insert(asset, symbol);
        }
        converter
    }

    /// Add or replace a mapping in both directions.
    pub fn insert(&mut self, asset: Asset, symbol: impl Into<String>) {
        let symbol = symbol.into();
        if let Some(previous) = self.to_venue.insert(asset.clone(), symbol.clone()) {
            self.from_venue.remove(&previous);
        }
        self.from_venue.insert(symbol, asset);
    }

    /// Venue-native symbol for an asset.
    pub fn to_venue(&self, asset: &Asset) -> Result<String, DomainError> {
        self.to_venue
            .get(asset)
            .cloned()
            .ok_or_else(|| DomainError::UnknownAsset {
                asset: asset.to_string(),
            })
    }

    /// Asset for a venue-native symbol.
    pub fn from_venue(&self, symbol: &str) -> Result<Asset, DomainError> {
        self.from_venue
            .get(symbol)
            .cloned()
            .ok_or_else(|| DomainError::UnknownVenueAsset {
                symbol: symbol.to_string(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.to_venue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_venue.is_empty()
    }
}
