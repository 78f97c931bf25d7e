use venuekit::domain::Number;

/// Compare numerically, ignoring precision.
pub fn assert_number_eq(actual: &Number, expected: &str) {
    let expected: rust_decimal::Decimal = expected.parse().expect("expected value must parse");
    assert_eq!(
        actual.as_decimal(),
        expected,
        "expected {expected}, got {actual}"
    );
}
