use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::Number;

/// Prefix of every [`ParseError::FieldNotFound`] message.
///
/// Callers that only have the rendered error can test for it with
/// `starts_with`; Rust callers should prefer [`ParseError::is_field_not_found`].
pub const FIELD_NOT_FOUND_PREFIX: &str = "could not find field in response map";

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while reading fields out of an untyped venue response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The key is absent. Often recoverable: callers map it to a default.
    #[error("could not find field in response map: {field} (from {context})")]
    FieldNotFound { field: String, context: String },

    #[error("could not parse the field '{field}' as a {expected} in the response from {context}: value={value}, type={actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
        context: String,
        value: String,
    },

    #[error("unable to convert the field '{field}' to a number in the response from {context}: value={value}, error={reason}")]
    InvalidNumber {
        field: String,
        context: String,
        value: String,
        reason: String,
    },

    #[error("could not parse response type from {context}: expected {expected}, got {actual}")]
    UnexpectedShape {
        context: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid value for '{field}' in the response from {context}: {reason}")]
    InvalidValue {
        field: String,
        context: String,
        reason: String,
    },
}

impl ParseError {
    /// True for the recoverable absent-field case.
    #[must_use]
    pub const fn is_field_not_found(&self) -> bool {
        matches!(self, Self::FieldNotFound { .. })
    }
}

/// Deposit validation and address-pool errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepositError {
    #[error("deposit amount ({amount}) is greater than limit ({limit})")]
    AmountAboveLimit { amount: Number, limit: Number },

    #[error("too many deposit addresses, try reusing one of them")]
    TooManyAddresses,

    #[error("attempt to generate a new deposit address for {asset} failed")]
    AddressGenerationFailed { asset: String },
}

/// Withdrawal validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WithdrawError {
    #[error("withdraw amount ({amount}) is greater than limit ({limit})")]
    AmountAboveLimit { amount: Number, limit: Number },

    #[error("amount to withdraw is invalid: {amount}, fee: {fee}")]
    AmountInvalid { amount: Number, fee: Number },
}

/// Fill tracker lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillTrackerError {
    #[error("fill tracker for {pair} has already been started")]
    AlreadyStarted { pair: String },

    #[error("fill tracker task for {pair} ended abnormally: {reason}")]
    TaskAborted { pair: String, reason: String },
}

/// Errors converting between ledger mutator representations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid {field} '{value}' in offer operation at index {index}: {reason}")]
    InvalidOperation {
        index: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid offer mutator at index {index}: {reason}")]
    InvalidMutator { index: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Deposit(#[from] DepositError),

    #[error(transparent)]
    Withdraw(#[from] WithdrawError),

    #[error(transparent)]
    FillTracker(#[from] FillTrackerError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Opaque failure from a venue transport, carrying the venue's message.
    #[error("venue error: {0}")]
    Venue(String),

    #[error("unsupported trading pair: {0}")]
    UnsupportedPair(String),

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_not_found_renders_with_documented_prefix() {
        let err = ParseError::FieldNotFound {
            field: "fee".into(),
            context: "DepositMethods".into(),
        };
        assert!(err.to_string().starts_with(FIELD_NOT_FOUND_PREFIX));
        assert!(err.is_field_not_found());
    }

    #[test]
    fn type_mismatch_does_not_share_prefix() {
        let err = ParseError::TypeMismatch {
            field: "fee".into(),
            expected: "number",
            actual: "bool",
            context: "DepositMethods".into(),
            value: "true".into(),
        };
        assert!(!err.to_string().starts_with(FIELD_NOT_FOUND_PREFIX));
        assert!(!err.is_field_not_found());
    }

    #[test]
    fn deposit_errors_render_numbers() {
        let err = DepositError::AmountAboveLimit {
            amount: Number::parse("2", 2).unwrap(),
            limit: Number::parse("1.5", 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "deposit amount (2.00) is greater than limit (1.50)"
        );
    }

    #[test]
    fn concern_errors_convert_into_crate_error() {
        let err: Error = DepositError::TooManyAddresses.into();
        assert!(matches!(err, Error::Deposit(DepositError::TooManyAddresses)));
        assert_eq!(
            err.to_string(),
            "too many deposit addresses, try reusing one of them"
        );
    }
}
