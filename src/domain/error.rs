//! Domain validation errors for core value types.
//!
//! These errors are returned by fallible constructors that enforce the
//! invariants of [`Number`](super::Number), [`Asset`](super::Asset) and
//! [`TradingPair`](super::TradingPair).
//!
//! # Examples
//!
//! ```
//! use venuekit::domain::error::DomainError;
//! use venuekit::domain::Number;
//!
//! let result = Number::parse("not-a-number", 10);
//! assert!(matches!(result, Err(DomainError::InvalidNumber { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The string could not be parsed as a decimal.
    #[error("invalid number '{value}': {reason}")]
    InvalidNumber {
        /// The rejected input.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Floats that are NaN or infinite have no decimal representation.
    #[error("float {value} is not a finite number")]
    NonFiniteFloat {
        /// The rejected float, rendered.
        value: String,
    },

    /// Precision exceeds what the decimal backend can carry.
    #[error("precision {precision} exceeds the maximum of {max}")]
    PrecisionOutOfRange {
        /// The requested precision.
        precision: u32,
        /// The supported maximum.
        max: u32,
    },

    /// The asset has no venue-native representation.
    #[error("asset '{asset}' is not known to the asset converter")]
    UnknownAsset {
        /// The venue-agnostic asset code.
        asset: String,
    },

    /// The venue string has no venue-agnostic asset.
    #[error("venue asset '{symbol}' is not known to the asset converter")]
    UnknownVenueAsset {
        /// The venue-native symbol.
        symbol: String,
    },

    /// Asset codes cannot be empty.
    #[error("asset code cannot be empty")]
    EmptyAsset,

    /// Trading pairs are written as `BASE/QUOTE`.
    #[error("invalid trading pair '{value}', expected BASE/QUOTE")]
    InvalidPair {
        /// The rejected input.
        value: String,
    },
}
