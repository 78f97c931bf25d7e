//! Ledger offer conversion driven through the reduced exchange contract.

use std::sync::Arc;

use tokio::sync::oneshot;
use venuekit::adapter::outbound::ledger::{
    mutators_to_operations, operations_to_mutators, LedgerAsset, ManageOfferMutator, OfferOperation,
    SellOffer,
};
use venuekit::domain::Asset;
use venuekit::error::{Error, LedgerError};
use venuekit::port::{Balance, ExchangeShim, SubmitMode};
use venuekit::testkit::domain::num;
use venuekit::testkit::RecordingShim;

fn offer(amount: &str, price: &str, offer_id: u64) -> SellOffer {
    SellOffer {
        selling: LedgerAsset::Native,
        buying: LedgerAsset::credit("USD", "GDUKMGUGDZQK6YHYA5Z6AY2G4XDSZPSZ3SW5UN3ARVMO6QSRDWP5YLEX"),
        amount: amount.to_string(),
        price: price.to_string(),
        offer_id,
    }
}

/// Anything that can carry ledger mutators, whatever else it is.
async fn place<S>(venue: &S, ops: &[OfferOperation]) -> Result<String, Error>
where
    S: ExchangeShim<Mutator = ManageOfferMutator>,
{
    let mutators = operations_to_mutators(ops)?;
    let (tx, rx) = oneshot::channel();
    venue
        .submit_ops(
            mutators,
            SubmitMode::Confirmed,
            Some(Box::new(move |result: Result<String, Error>| {
                let _ = tx.send(result);
            })),
        )
        .await?;
    rx.await.expect("callback dropped")
}

#[tokio::test]
async fn batch_order_survives_submission() {
    let venue = RecordingShim::new();
    let ops = vec![
        OfferOperation::ManageSell(offer("100", "0.12", 0)),
        OfferOperation::ManageSell(offer("0", "0.12", 77)),
        OfferOperation::PassiveSell(offer("25.5", "0.125", 0)),
    ];

    let hash = place(&venue, &ops).await.unwrap();

    assert_eq!(hash, "tx-1");
    let batches = venue.batches();
    assert_eq!(batches.len(), 1);
    let (submitted, mode) = &batches[0];
    assert_eq!(*mode, SubmitMode::Confirmed);
    assert_eq!(submitted.len(), 3);
    assert_eq!(submitted[1].offer_id, 77);
    assert!(submitted[2].passive);

    let back = mutators_to_operations(submitted).unwrap();
    assert_eq!(back[0].offer().amount, "100");
    assert_eq!(back[1].offer().amount, "0");
    assert_eq!(back[2].offer().price, "0.125");
    assert!(back[2].is_passive());
}

#[tokio::test]
async fn invalid_operation_is_never_submitted() {
    let venue = RecordingShim::new();
    let ops = vec![
        OfferOperation::ManageSell(offer("1", "0.12", 0)),
        OfferOperation::ManageSell(offer("0.00000001", "0.12", 0)),
    ];

    let err = place(&venue, &ops).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Ledger(LedgerError::InvalidOperation { index: 1, field: "amount", .. })
    ));
    assert!(venue.batches().is_empty());
}

#[tokio::test]
async fn sync_submission_runs_callback_before_returning() {
    let venue = RecordingShim::new();
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let sink = seen.clone();

    venue
        .submit_ops_sync(
            Vec::new(),
            SubmitMode::FireAndForget,
            Some(Box::new(move |result: Result<String, Error>| {
                *sink.lock() = result.ok();
            })),
        )
        .await
        .unwrap();

    assert_eq!(seen.lock().as_deref(), Some("tx-1"));
}

#[tokio::test]
async fn account_reads_go_through_the_shim() {
    let usd = Asset::new("USD");
    let venue = RecordingShim::new()
        .with_balance(
            usd.clone(),
            Balance {
                balance: num("150"),
                trust: num("1000"),
                reserve: num("0"),
            },
        )
        .with_offer(offer("100", "0.12", 42));

    let balance = venue.get_balance_hack(&usd).await.unwrap();
    assert_eq!(balance.trust, num("1000"));
    assert!(venue.get_balance_hack(&Asset::new("EUR")).await.is_err());

    let offers = venue.load_offers_hack().await.unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].offer_id, 42);
}
