//! Per-pair order precision and minimum-size limits.
//!
//! A venue supplies [`OrderConstraints`] for the pairs it knows; operators
//! can replace individual fields with an [`OrderConstraintsOverride`].

use std::fmt;

use super::number::Number;

/// Precision and minimum-size limits for orders on one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConstraints {
    pub price_precision: u32,
    pub volume_precision: u32,
    /// Smallest order size in base units.
    pub min_base_volume: Number,
    /// Smallest order size in quote units, when the venue enforces one.
    pub min_quote_volume: Option<Number>,
}

impl OrderConstraints {
    #[must_use]
    pub const fn new(
        price_precision: u32,
        volume_precision: u32,
        min_base_volume: Number,
        min_quote_volume: Option<Number>,
    ) -> Self {
        Self {
            price_precision,
            volume_precision,
            min_base_volume,
            min_quote_volume,
        }
    }

    /// Copy of these constraints with every field the override sets replaced.
    #[must_use]
    pub fn with_override(&self, over: &OrderConstraintsOverride) -> Self {
        Self {
            price_precision: over.price_precision.unwrap_or(self.price_precision),
            volume_precision: over.volume_precision.unwrap_or(self.volume_precision),
            min_base_volume: over.min_base_volume.unwrap_or(self.min_base_volume),
            min_quote_volume: match over.min_quote_volume {
                Some(v) => v,
                None => self.min_quote_volume,
            },
        }
    }

    /// Constraints built purely from a complete override.
    #[must_use]
    pub fn from_override(over: &OrderConstraintsOverride) -> Option<Self> {
        Some(Self {
            price_precision: over.price_precision?,
            volume_precision: over.volume_precision?,
            min_base_volume: over.min_base_volume?,
            min_quote_volume: over.min_quote_volume?,
        })
    }
}

impl fmt::Display for OrderConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderConstraints[price_precision: {}, volume_precision: {}, min_base_volume: {}, min_quote_volume: ",
            self.price_precision, self.volume_precision, self.min_base_volume
        )?;
        match &self.min_quote_volume {
            Some(v) => write!(f, "{v}]"),
            None => write!(f, "<none>]"),
        }
    }
}

/// Optional replacement for each field of [`OrderConstraints`].
///
/// `min_quote_volume` is doubly optional: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderConstraintsOverride {
    pub price_precision: Option<u32>,
    pub volume_precision: Option<u32>,
    pub min_base_volume: Option<Number>,
    pub min_quote_volume: Option<Option<Number>>,
}

impl OrderConstraintsOverride {
    /// Fold `updates` into `self`; fields set in `updates` win.
    pub fn augment(&mut self, updates: &Self) {
        if updates.price_precision.is_some() {
            self.price_precision = updates.price_precision;
        }
        if updates.volume_precision.is_some() {
            self.volume_precision = updates.volume_precision;
        }
        if updates.min_base_volume.is_some() {
            self.min_base_volume = updates.min_base_volume;
        }
        if updates.min_quote_volume.is_some() {
            self.min_quote_volume = updates.min_quote_volume;
        }
    }

    /// True when every field is set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.price_precision.is_some()
            && self.volume_precision.is_some()
            && self.min_base_volume.is_some()
            && self.min_quote_volume.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
