//! Deposit address acquisition against scripted listings.

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::assertions::assert_number_eq;
use venuekit::application::{AddressReservations, DepositManager};
use venuekit::domain::Asset;
use venuekit::error::{DepositError, Error};
use venuekit::port::DepositApi;
use venuekit::testkit::domain::{address, num};
use venuekit::testkit::ScriptedDepositSource;

const TOO_MANY: &str = "EFunding:Too many addresses";

fn btc() -> Asset {
    Asset::new("BTC")
}

#[tokio::test]
async fn forces_generation_when_no_address_is_fresh() {
    let source = ScriptedDepositSource::bitcoin()
        .with_listing(vec![address("used-1", false), address("used-2", false)])
        .with_listing(vec![
            address("used-1", false),
            address("used-2", false),
            address("generated", true),
        ]);
    let manager = DepositManager::new(source);

    let result = manager.prepare_deposit(&btc(), &num("0.5")).await.unwrap();

    assert_eq!(result.address, "generated");
    assert_eq!(result.expire_ts, 0);
    assert_eq!(manager.source().listing_calls(), vec![false, true]);
}

#[tokio::test]
async fn gives_up_after_one_forced_attempt() {
    let source = ScriptedDepositSource::bitcoin()
        .with_listing(vec![address("used", false)])
        .with_listing(vec![address("used", false)])
        .with_listing(vec![address("never-reached", true)]);
    let manager = DepositManager::new(source);

    let err = manager.prepare_deposit(&btc(), &num("0.5")).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Deposit(DepositError::AddressGenerationFailed { ref asset }) if asset == "BTC"
    ));
    assert_eq!(manager.source().listing_calls(), vec![false, true]);
}

#[tokio::test]
async fn amount_above_limit_fails_before_listing() {
    let source = ScriptedDepositSource::bitcoin()
        .with_limit(num("1"))
        .with_listing(vec![address("fresh", true)]);
    let manager = DepositManager::new(source);

    let err = manager.prepare_deposit(&btc(), &num("1.5")).await.unwrap_err();

    match err {
        Error::Deposit(DepositError::AmountAboveLimit { amount, limit }) => {
            assert_number_eq(&amount, "1.5");
            assert_number_eq(&limit, "1");
        }
        other => panic!("expected AmountAboveLimit, got {other}"),
    }
    assert_eq!(manager.source().method_calls(), 1);
    assert!(manager.source().listing_calls().is_empty());
}

#[tokio::test]
async fn full_address_pool_is_reported_as_too_many_addresses() {
    let source = ScriptedDepositSource::bitcoin()
        .with_signal(TOO_MANY)
        .with_listing(vec![address("used", false)])
        .with_listing_error(TOO_MANY);
    let manager = DepositManager::new(source);

    let err = manager.prepare_deposit(&btc(), &num("0.5")).await.unwrap_err();

    assert!(matches!(err, Error::Deposit(DepositError::TooManyAddresses)));
    assert_eq!(manager.source().listing_calls(), vec![false, true]);
}

#[tokio::test]
async fn signal_is_matched_as_a_substring() {
    let source = ScriptedDepositSource::bitcoin()
        .with_signal(TOO_MANY)
        .with_listing_error(&format!("venue said: {TOO_MANY} (limit 5)"));
    let manager = DepositManager::new(source);

    let err = manager.prepare_deposit(&btc(), &num("0.5")).await.unwrap_err();

    assert!(matches!(err, Error::Deposit(DepositError::TooManyAddresses)));
}

#[tokio::test]
async fn fee_comes_from_the_deposit_method() {
    let source = ScriptedDepositSource::bitcoin()
        .with_fee(num("0.0005"))
        .with_listing(vec![address("fresh", true)]);
    let manager = DepositManager::new(source);

    let result = manager.prepare_deposit(&btc(), &num("0.5")).await.unwrap();

    assert_number_eq(&result.fee.unwrap(), "0.0005");
}

#[tokio::test]
async fn shared_reservations_spread_concurrent_deposits() {
    let listing = vec![address("a", true), address("b", true)];
    let reservations = Arc::new(AddressReservations::new(Duration::from_secs(60)));
    let first = DepositManager::with_reservations(
        ScriptedDepositSource::bitcoin().with_listing(listing.clone()),
        reservations.clone(),
    );
    let second = DepositManager::with_reservations(
        ScriptedDepositSource::bitcoin().with_listing(listing),
        reservations.clone(),
    );

    let (asset, amount) = (btc(), num("0.1"));
    let (a, b) = tokio::join!(
        first.prepare_deposit(&asset, &amount),
        second.prepare_deposit(&asset, &amount),
    );
    let (a, b) = (a.unwrap().address, b.unwrap().address);

    assert_ne!(a, b);
    assert!(reservations.is_reserved("a"));
    assert!(reservations.is_reserved("b"));
}

#[tokio::test]
async fn plain_manager_reuses_a_fresh_address_without_forcing() {
    let listing = vec![address("only", true)];
    let manager = DepositManager::new(
        ScriptedDepositSource::bitcoin()
            .with_listing(listing.clone())
            .with_listing(listing),
    );

    let first = manager.prepare_deposit(&btc(), &num("0.1")).await.unwrap();
    let second = manager.prepare_deposit(&btc(), &num("0.1")).await.unwrap();

    assert_eq!(first.address, "only");
    assert_eq!(second.address, "only");
    assert_eq!(manager.source().listing_calls(), vec![false, false]);
    assert!(!manager.reservations().is_enabled());
}

#[tokio::test]
async fn disabled_reservations_hand_out_the_oldest_fresh_address() {
    let listing = vec![address("a", true), address("b", true)];
    let manager = DepositManager::with_reservations(
        ScriptedDepositSource::bitcoin()
            .with_listing(listing.clone())
            .with_listing(listing),
        Arc::new(AddressReservations::disabled()),
    );

    let first = manager.prepare_deposit(&btc(), &num("0.1")).await.unwrap();
    let second = manager.prepare_deposit(&btc(), &num("0.1")).await.unwrap();

    assert_eq!(first.address, "a");
    assert_eq!(second.address, "a");
}
