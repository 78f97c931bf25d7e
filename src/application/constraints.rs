//! Venue default order constraints plus operator overrides.

use std::collections::HashMap;

use dashmap::DashMap;
use tracing::debug;

use crate::domain::{OrderConstraints, OrderConstraintsOverride, TradingPair};

/// Per-pair constraints a venue adapter can hand out as its
/// [`Constrainable`](crate::port::Constrainable) implementation.
///
/// Defaults are fixed at construction; overrides are upserted concurrently
/// and merged field by field on every read.
#[derive(Debug, Default)]
pub struct ConstraintsTable {
    defaults: HashMap<TradingPair, OrderConstraints>,
    overrides: DashMap<TradingPair, OrderConstraintsOverride>,
}

impl ConstraintsTable {
    #[must_use]
    pub fn new(defaults: HashMap<TradingPair, OrderConstraints>) -> Self {
        Self {
            defaults,
            overrides: DashMap::new(),
        }
    }

    /// Effective constraints for `pair`.
    ///
    /// With a default, the stored override is applied on top. Without one, a
    /// complete override stands on its own; anything less yields `None`.
    #[must_use]
    pub fn get(&self, pair: &TradingPair) -> Option<OrderConstraints> {
        let over = self.overrides.get(pair);
        match (self.defaults.get(pair), over.as_deref()) {
            (Some(default), Some(over)) => Some(default.with_override(over)),
            (Some(default), None) => Some(default.clone()),
            (None, Some(over)) => OrderConstraints::from_override(over),
            (None, None) => None,
        }
    }

    /// Merge `updates` into the stored override for `pair`.
    pub fn set_override(&self, pair: &TradingPair, updates: &OrderConstraintsOverride) {
        self.overrides
            .entry(pair.clone())
            .or_default()
            .augment(updates);
        debug!(pair = %pair, "Updated order constraint override");
    }

    /// Stored override for `pair`, if any.
    #[must_use]
    pub fn get_override(&self, pair: &TradingPair) -> Option<OrderConstraintsOverride> {
        self.overrides.get(pair).map(|o| o.clone())
    }

    /// Pairs with a default entry.
    pub fn pairs(&self) -> impl Iterator<Item = &TradingPair> {
        self.defaults.keys()
    }
}
