//! Fixed-precision decimal value type.
//!
//! Every price, amount, fee and limit that crosses a venue boundary is a
//! [`Number`]. The value is rounded to its precision once, at construction,
//! so two numbers built from the same decimal at the same precision are equal
//! and render identically whether they came from a string or a float.
//!
//! # Examples
//!
//! ```
//! use venuekit::domain::Number;
//!
//! let from_str = Number::parse("12.3400000000", 10).unwrap();
//! let from_float = Number::from_f64(12.34, 10).unwrap();
//!
//! assert_eq!(from_str, from_float);
//! assert_eq!(from_str.as_string(), "12.3400000000");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::DomainError;

/// Largest precision the decimal backend can represent.
pub const MAX_PRECISION: u32 = 28;

/// Immutable decimal value with a fixed display and comparison precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Number {
    value: Decimal,
    precision: u32,
}

impl Number {
    /// Create a number from a decimal, rounding it to `precision` places.
    pub fn new(value: Decimal, precision: u32) -> Result<Self, DomainError> {
        check_precision(precision)?;
        Ok(Self {
            value: round(value, precision),
            precision,
        })
    }

    /// Zero at the given precision.
    pub fn zero(precision: u32) -> Result<Self, DomainError> {
        Self::new(Decimal::ZERO, precision)
    }

    /// Parse a decimal string such as `"12.3400000000"`.
    pub fn parse(s: &str, precision: u32) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| DomainError::InvalidNumber {
                value: s.to_string(),
                reason: e.to_string(),
            })?;
        Self::new(value, precision)
    }

    /// Convert a float, rounding at the given precision.
    pub fn from_f64(f: f64, precision: u32) -> Result<Self, DomainError> {
        if !f.is_finite() {
            return Err(DomainError::NonFiniteFloat {
                value: f.to_string(),
            });
        }
        let value = Decimal::from_f64(f).ok_or_else(|| DomainError::InvalidNumber {
            value: f.to_string(),
            reason: "float is out of decimal range".to_string(),
        })?;
        Self::new(value, precision)
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Number of decimal places carried.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Lossy float view, for logging and ratio math only.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(0.0)
    }

    /// Render with exactly `precision` decimal places.
    #[must_use]
    pub fn as_string(&self) -> String {
        format!("{:.*}", self.precision as usize, self.value)
    }

    /// Re-round to a different precision.
    pub fn round_to(&self, precision: u32) -> Result<Self, DomainError> {
        Self::new(self.value, precision)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.value.is_sign_positive() && !self.value.is_zero()
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Sum at the larger of the two precisions.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.combine(other, self.value.saturating_add(other.value))
    }

    /// Difference at the larger of the two precisions.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.combine(other, self.value.saturating_sub(other.value))
    }

    /// Product at the larger of the two precisions.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        self.combine(other, self.value.saturating_mul(other.value))
    }

    /// Quotient at the larger of the two precisions, `None` on division by zero.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        self.value
            .checked_div(other.value)
            .map(|v| self.combine(other, v))
    }

    fn combine(&self, other: &Self, value: Decimal) -> Self {
        let precision = self.precision.max(other.precision);
        Self {
            value: round(value, precision),
            precision,
        }
    }
}

/// Values are compared numerically. Numbers with equal values but different
/// precisions are not equal, so they are left unordered.
impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.value.cmp(&other.value) {
            Ordering::Equal if self.precision != other.precision => None,
            ord => Some(ord),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

fn check_precision(precision: u32) -> Result<(), DomainError> {
    if precision > MAX_PRECISION {
        return Err(DomainError::PrecisionOutOfRange {
            precision,
            max: MAX_PRECISION,
        });
    }
    Ok(())
}

fn round(value: Decimal, precision: u32) -> Decimal {
    value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
}
