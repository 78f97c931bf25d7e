mod support;

use std::time::Duration;

use support::config::write_temp_config;
use venuekit::error::{ConfigError, Error};
use venuekit::infrastructure::config::Config;
use venuekit::port::Constrainable;
use venuekit::testkit::domain::pair;
use venuekit::testkit::RecordingShim;

#[test]
fn empty_file_yields_defaults() {
    let file = write_temp_config("");
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.fill_tracker.poll_interval(), Duration::from_secs(5));
    assert_eq!(config.deposit.reservation_ttl(), Duration::ZERO);
    assert!(!config.deposit.reservations().is_enabled());
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.is_json());
    assert!(config.constraint_overrides.is_empty());
}

#[test]
fn loads_every_section() {
    let file = write_temp_config(
        r#"
[logging]
level = "debug"
format = "json"

[fill_tracker]
poll_interval_ms = 250

[deposit]
reservation_ttl_secs = 60

[constraint_overrides."XLM/USD"]
volume_precision = 4
min_base_volume = "50"

[constraint_overrides."BTC/USD"]
min_quote_volume = 10
"#,
    );
    let config = Config::load(file.path()).unwrap();

    assert!(config.logging.is_json());
    assert_eq!(config.fill_tracker.poll_interval(), Duration::from_millis(250));
    assert!(config.deposit.reservations().is_enabled());

    let overrides = config.constraint_overrides().unwrap();
    assert_eq!(overrides.len(), 2);
    // Keys are applied in sorted order.
    assert_eq!(overrides[0].0, pair("BTC/USD"));
    assert_eq!(overrides[1].0, pair("XLM/USD"));
    assert_eq!(overrides[1].1.volume_precision, Some(4));
    assert_eq!(overrides[1].1.min_base_volume.unwrap().as_string(), "50.0000");
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Config::load("/nonexistent/venuekit.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = Config::parse_toml("[fill_tracker\npoll_interval_ms = 1").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn zero_poll_interval_is_rejected() {
    let err = Config::parse_toml("[fill_tracker]\npoll_interval_ms = 0").unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "poll_interval_ms",
            ..
        })
    ));
}

#[test]
fn bad_pair_key_is_rejected() {
    let err = Config::parse_toml("[constraint_overrides.XLMUSD]\nprice_precision = 4").unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "constraint_overrides",
            ..
        })
    ));
}

#[test]
fn unknown_override_field_is_rejected() {
    let err = Config::parse_toml("[constraint_overrides.\"XLM/USD\"]\nmax_volume = 4").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn negative_minimum_is_rejected() {
    let err =
        Config::parse_toml("[constraint_overrides.\"XLM/USD\"]\nmin_base_volume = \"-1\"").unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "min_base_volume",
            ..
        })
    ));
}

#[test]
fn overrides_apply_to_any_constrainable_venue() {
    let config = Config::parse_toml(
        r#"
[constraint_overrides."XLM/USD"]
price_precision = 5
volume_precision = 7
min_base_volume = "20"
min_quote_volume = "1"
"#,
    )
    .unwrap();
    let venue = RecordingShim::new();
    assert!(venue.get_order_constraints(&pair("XLM/USD")).is_none());

    assert_eq!(config.apply_constraint_overrides(&venue).unwrap(), 1);

    // A complete override stands in for missing venue defaults.
    let constraints = venue.get_order_constraints(&pair("XLM/USD")).unwrap();
    assert_eq!(constraints.price_precision, 5);
    assert_eq!(constraints.volume_precision, 7);
    assert_eq!(constraints.min_base_volume.as_string(), "20.0000000");
    assert!(constraints.min_quote_volume.is_some());
}
