//! Typed field extraction from untyped venue responses.
//!
//! Venues disagree on wire types: the same logical number arrives as a JSON
//! float on one endpoint and as a decimal string on another, booleans stand
//! in for "no limit", and optional fields are simply left out. The helpers
//! here read one field at a time and report exactly what went wrong.
//!
//! Absent fields surface as [`ParseError::FieldNotFound`]. That case is
//! recoverable and callers decide what it means; wrap the call in
//! [`optional`] to turn it into `None`. Every other [`ParseError`] is a
//! contract violation by the venue and should propagate.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use venuekit::application::parser::{optional, parse_bool, parse_number};
//!
//! let value = json!({ "fee": "0.0005000000", "gen-address": true });
//! let map = value.as_object().unwrap();
//!
//! let fee = parse_number(map, "fee", "DepositMethods").unwrap();
//! assert_eq!(fee.as_string(), "0.0005000000");
//! assert!(parse_bool(map, "gen-address", "DepositMethods").unwrap());
//! assert!(optional(parse_number(map, "limit", "DepositMethods")).unwrap().is_none());
//! ```

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::domain::Number;
use crate::error::ParseError;

/// Precision applied to every number read from a response.
pub const NUMBER_PRECISION: u32 = 10;

/// A JSON object as returned by a remote query.
pub type ResponseMap = Map<String, Value>;

/// Name of the runtime representation of a value, for error messages.
#[must_use]
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_key_present<'a>(
    map: &'a ResponseMap,
    key: &str,
    context: &str,
) -> Result<&'a Value, ParseError> {
    map.get(key).ok_or_else(|| ParseError::FieldNotFound {
        field: key.to_string(),
        context: context.to_string(),
    })
}

fn type_mismatch(field: &str, expected: &'static str, context: &str, value: &Value) -> ParseError {
    ParseError::TypeMismatch {
        field: field.to_string(),
        expected,
        actual: value_type_name(value),
        context: context.to_string(),
        value: value.to_string(),
    }
}

/// Read a string field.
pub fn parse_string(map: &ResponseMap, key: &str, context: &str) -> Result<String, ParseError> {
    let value = check_key_present(map, key, context)?;
    value_as_string(value, key, context)
}

/// Read a boolean field.
pub fn parse_bool(map: &ResponseMap, key: &str, context: &str) -> Result<bool, ParseError> {
    let value = check_key_present(map, key, context)?;
    value
        .as_bool()
        .ok_or_else(|| type_mismatch(key, "bool", context, value))
}

/// Read a number field at [`NUMBER_PRECISION`], accepting either a decimal
/// string or a JSON number.
pub fn parse_number(map: &ResponseMap, key: &str, context: &str) -> Result<Number, ParseError> {
    parse_number_with_precision(map, key, context, NUMBER_PRECISION)
}

/// [`parse_number`] at an explicit precision.
pub fn parse_number_with_precision(
    map: &ResponseMap,
    key: &str,
    context: &str,
    precision: u32,
) -> Result<Number, ParseError> {
    let value = check_key_present(map, key, context)?;
    value_as_number(value, key, context, precision)
}

/// Read a nested object field.
pub fn parse_object<'a>(map: &'a ResponseMap, key: &str, context: &str) -> Result<&'a ResponseMap, ParseError> {
    let value = check_key_present(map, key, context)?;
    value
        .as_object()
        .ok_or_else(|| type_mismatch(key, "object", context, value))
}

/// Read a nested array field.
pub fn parse_array<'a>(map: &'a ResponseMap, key: &str, context: &str) -> Result<&'a [Value], ParseError> {
    let value = check_key_present(map, key, context)?;
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| type_mismatch(key, "array", context, value))
}

/// Interpret a bare value (e.g. an array element) as a string.
pub fn value_as_string(value: &Value, field: &str, context: &str) -> Result<String, ParseError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| type_mismatch(field, "string", context, value))
}

/// Interpret a bare value as a number. Strings are parsed as decimals; JSON
/// numbers are converted at the same precision; anything else is a type
/// mismatch.
pub fn value_as_number(
    value: &Value,
    field: &str,
    context: &str,
    precision: u32,
) -> Result<Number, ParseError> {
    let invalid = |reason: String| ParseError::InvalidNumber {
        field: field.to_string(),
        context: context.to_string(),
        value: value.to_string(),
        reason,
    };

    match value {
        Value::String(s) => Number::parse(s, precision).map_err(|e| invalid(e.to_string())),
        Value::Number(n) => {
            let converted = if let Some(i) = n.as_i64() {
                Number::new(Decimal::from(i), precision)
            } else if let Some(u) = n.as_u64() {
                Number::new(Decimal::from(u), precision)
            } else {
                Number::from_f64(n.as_f64().unwrap_or(f64::NAN), precision)
            };
            converted.map_err(|e| invalid(e.to_string()))
        }
        other => Err(type_mismatch(field, "number", context, other)),
    }
}

/// Require an object payload.
pub fn expect_object<'a>(value: &'a Value, context: &str) -> Result<&'a ResponseMap, ParseError> {
    value.as_object().ok_or_else(|| ParseError::UnexpectedShape {
        context: context.to_string(),
        expected: "object",
        actual: value_type_name(value),
    })
}

/// Require an array payload.
pub fn expect_array<'a>(value: &'a Value, context: &str) -> Result<&'a [Value], ParseError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ParseError::UnexpectedShape {
            context: context.to_string(),
            expected: "array",
            actual: value_type_name(value),
        })
}

/// Map an absent field to `None`, keeping every other outcome.
pub fn optional<T>(result: Result<T, ParseError>) -> Result<Option<T>, ParseError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_field_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
