//! Kraken adapter against scripted API responses.
#![cfg(feature = "kraken")]

mod support;

use std::sync::Arc;

use serde_json::json;
use support::assertions::assert_number_eq;
use support::kraken::{bitcoin_method, history_entry, kraken};
use venuekit::adapter::outbound::kraken::Kraken;
use venuekit::domain::{Asset, CancelOrderResult, Cursor, Order, OrderAction, TransactionId};
use venuekit::error::{DepositError, Error, WithdrawError};
use venuekit::infrastructure::config::Config;
use venuekit::port::{
    Account, Constrainable, DepositApi, FillTrackable, OrderbookFetcher, SubmitMode, TickerApi,
    TradeApi, TradeFetcher, WithdrawApi,
};
use venuekit::testkit::domain::{num, pair};
use venuekit::testkit::ScriptedQuery;

#[tokio::test]
async fn balances_default_missing_assets_to_zero() {
    let (kraken, _) = kraken(ScriptedQuery::new().with_response(
        "Balance",
        json!({ "XXBT": "0.5000000000", "ZUSD": "120.5" }),
    ));

    let balances = kraken
        .get_account_balances(&[Asset::new("BTC"), Asset::new("USD"), Asset::new("XLM")])
        .await
        .unwrap();

    assert_number_eq(&balances[&Asset::new("BTC")], "0.5");
    assert_number_eq(&balances[&Asset::new("USD")], "120.5");
    assert!(balances[&Asset::new("XLM")].is_zero());
}

#[tokio::test]
async fn unknown_asset_fails_without_querying() {
    let (kraken, query) = kraken(ScriptedQuery::new());

    let err = kraken
        .get_account_balances(&[Asset::new("DOGE")])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Domain(_)));
    assert!(query.calls().is_empty());
}

#[tokio::test]
async fn ticker_skips_pairs_the_venue_left_out() {
    let (kraken, query) = kraken(ScriptedQuery::new().with_response(
        "Ticker",
        json!({
            "XXBTZUSD": {
                "a": ["30000.10000", "1", "1.000"],
                "b": ["30000.00000", "2", "2.000"],
                "c": ["30000.05000", "0.01"]
            }
        }),
    ));

    let tickers = kraken
        .get_ticker_price(&[pair("BTC/USD"), pair("XLM/USD")])
        .await
        .unwrap();

    assert_eq!(tickers.len(), 1);
    let btc = &tickers[&pair("BTC/USD")];
    assert_number_eq(btc.ask_price.as_ref().unwrap(), "30000.1");
    assert_number_eq(btc.bid_price.as_ref().unwrap(), "30000");
    assert_number_eq(btc.last_price.as_ref().unwrap(), "30000.05");
    assert_eq!(
        query.calls_to("Ticker")[0].get("pair").map(String::as_str),
        Some("XXBTZUSD,XXLMZUSD")
    );
}

#[tokio::test]
async fn ticker_skips_pairs_without_a_kraken_name() {
    let (kraken, query) = kraken(ScriptedQuery::new().with_response(
        "Ticker",
        json!({ "XXBTZUSD": { "c": ["30000.05000", "0.01"] } }),
    ));

    let tickers = kraken
        .get_ticker_price(&[pair("BTC/USD"), pair("DOGE/USD")])
        .await
        .unwrap();

    assert_eq!(tickers.len(), 1);
    assert!(tickers.contains_key(&pair("BTC/USD")));
    assert_eq!(
        query.calls_to("Ticker")[0].get("pair").map(String::as_str),
        Some("XXBTZUSD")
    );
}

#[tokio::test]
async fn ticker_with_no_known_pairs_is_empty_without_querying() {
    let (kraken, query) = kraken(ScriptedQuery::new());

    let tickers = kraken.get_ticker_price(&[pair("DOGE/USD")]).await.unwrap();

    assert!(tickers.is_empty());
    assert!(query.calls().is_empty());
}

#[tokio::test]
async fn order_book_is_truncated_to_max_count() {
    let (kraken, query) = kraken(ScriptedQuery::new().with_response(
        "Depth",
        json!({
            "XXLMZUSD": {
                "bids": [["0.1200", "100", 1688667796], ["0.1190", "50", 1688667796]],
                "asks": [["0.1210", "80", 1688667796], ["0.1220", "20", 1688667796]]
            }
        }),
    ));

    let book = kraken.get_order_book(&pair("XLM/USD"), 1).await.unwrap();

    assert_eq!(book.bids().len(), 1);
    assert_eq!(book.asks().len(), 1);
    assert_number_eq(book.best_bid().unwrap().price(), "0.12");
    assert_number_eq(book.best_ask().unwrap().volume(), "80");
    assert_eq!(
        query.calls_to("Depth")[0].get("count").map(String::as_str),
        Some("1")
    );
}

#[tokio::test]
async fn order_book_for_missing_pair_is_unsupported() {
    let (kraken, _) = kraken(ScriptedQuery::new().with_response("Depth", json!({})));

    let err = kraken.get_order_book(&pair("XLM/USD"), 10).await.unwrap_err();

    assert!(matches!(err, Error::UnsupportedPair(_)));
}

#[tokio::test]
async fn trade_history_pages_filters_and_sorts() {
    let (kraken, query) = kraken(
        ScriptedQuery::new()
            .with_response(
                "TradesHistory",
                json!({
                    "trades": {
                        "T1": history_entry("XXLMZUSD", "buy", "0.1200", "100", "1688667796.8802"),
                        "T2": history_entry("XXBTZUSD", "sell", "30000", "0.01", "1688667790.0")
                    },
                    "count": 3
                }),
            )
            .with_response(
                "TradesHistory",
                json!({
                    "trades": {
                        "T3": history_entry("XXLMZUSD", "sell", "0.1190", "40", "1688667700.5")
                    },
                    "count": 3
                }),
            ),
    );

    let start = Cursor::new("1688660000");
    let result = kraken
        .get_trade_history(&pair("XLM/USD"), Some(&start), None)
        .await
        .unwrap();

    let ids: Vec<&str> = result
        .trades
        .iter()
        .map(|t| t.transaction_id().as_str())
        .collect();
    assert_eq!(ids, vec!["T3", "T1"]);
    assert_eq!(result.cursor.as_str(), "1688667796.8802");
    assert_eq!(result.trades[0].action(), OrderAction::Sell);
    assert_number_eq(result.trades[1].fee().unwrap(), "0.00312");

    let calls = query.calls_to("TradesHistory");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].get("start").map(String::as_str), Some("1688660000"));
    assert_eq!(calls[0].get("ofs"), None);
    assert_eq!(calls[1].get("ofs").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn empty_trade_history_keeps_the_start_cursor() {
    let (kraken, _) = kraken(
        ScriptedQuery::new().with_response("TradesHistory", json!({ "trades": {}, "count": 0 })),
    );

    let start = Cursor::new("1688660000");
    let result = kraken
        .get_trade_history(&pair("XLM/USD"), Some(&start), None)
        .await
        .unwrap();

    assert!(result.trades.is_empty());
    assert_eq!(result.cursor, start);
}

#[tokio::test]
async fn latest_trade_cursor_is_the_newest_fill_time() {
    let (kraken, query) = kraken(ScriptedQuery::new().with_response(
        "TradesHistory",
        json!({
            "trades": {
                "T1": history_entry("XXLMZUSD", "buy", "0.1200", "100", "1688667700.5"),
                "T2": history_entry("XXBTZUSD", "sell", "30000", "0.01", "1688667796.8802")
            },
            "count": 2
        }),
    ));

    let cursor = kraken.get_latest_trade_cursor().await.unwrap();

    assert_eq!(cursor.as_str(), "1688667796.8802");
    let calls = query.calls_to("TradesHistory");
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_empty());
}

#[tokio::test]
async fn latest_trade_cursor_without_fills_is_zero() {
    let (kraken, _) = kraken(
        ScriptedQuery::new().with_response("TradesHistory", json!({ "trades": {}, "count": 0 })),
    );

    let cursor = kraken.get_latest_trade_cursor().await.unwrap();

    assert_eq!(cursor.as_str(), "0");
}

#[tokio::test]
async fn public_trades_use_last_as_cursor() {
    let (kraken, query) = kraken(ScriptedQuery::new().with_response(
        "Trades",
        json!({
            "XXLMZUSD": [
                ["0.1200", "100.0", 1688667796.8802, "b", "l", "", 42],
                ["0.1210", "5.0", 1688667797.1, "s", "m", ""]
            ],
            "last": "1688667797100000000"
        }),
    ));

    let since = Cursor::new("1688667000000000000");
    let result = kraken.get_trades(&pair("XLM/USD"), Some(&since)).await.unwrap();

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].transaction_id().as_str(), "42");
    assert_eq!(result.trades[1].action(), OrderAction::Sell);
    assert_eq!(result.cursor.as_str(), "1688667797100000000");
    assert_eq!(
        query.calls_to("Trades")[0].get("since").map(String::as_str),
        Some("1688667000000000000")
    );
}

#[tokio::test]
async fn open_orders_match_display_pair_names() {
    let (kraken, _) = kraken(ScriptedQuery::new().with_response(
        "OpenOrders",
        json!({
            "open": {
                "OQCLML-BW3P3-BUCMWZ": {
                    "descr": { "pair": "XLMUSD", "type": "sell", "ordertype": "limit", "price": "0.1500" },
                    "vol": "100.00000000",
                    "vol_exec": "25.00000000",
                    "opentm": 1688667796.1,
                    "expiretm": 0
                },
                "OB5VMB-B4U2U-DK2WRW": {
                    "descr": { "pair": "XBTUSD", "type": "buy", "ordertype": "limit", "price": "29000" },
                    "vol": "0.01000000",
                    "vol_exec": "0.00000000",
                    "opentm": 1688667790.0,
                    "expiretm": 0
                }
            }
        }),
    ));

    let orders = kraken.get_open_orders(&[pair("XLM/USD")]).await.unwrap();

    assert_eq!(orders.len(), 1);
    let xlm = &orders[&pair("XLM/USD")];
    assert_eq!(xlm.len(), 1);
    assert_eq!(xlm[0].id, TransactionId::new("OQCLML-BW3P3-BUCMWZ"));
    assert_eq!(xlm[0].order.action, OrderAction::Sell);
    assert_number_eq(&xlm[0].volume_executed, "25");
    assert!(xlm[0].expire_time.is_none());
}

#[tokio::test]
async fn add_order_rounds_and_confirms() {
    let (kraken, query) = kraken(
        ScriptedQuery::new()
            .with_response(
                "AddOrder",
                json!({ "descr": { "order": "buy 40 XLMUSD @ limit 0.123457" }, "txid": ["OUF4EM-FRGI2-MQMWZD"] }),
            )
            .with_response("QueryOrders", json!({ "OUF4EM-FRGI2-MQMWZD": { "status": "open" } })),
    );
    let order = Order::limit(pair("XLM/USD"), OrderAction::Buy, num("0.1234567"), num("40"));

    let txid = kraken.add_order(&order, SubmitMode::Confirmed).await.unwrap();

    assert_eq!(txid.as_str(), "OUF4EM-FRGI2-MQMWZD");
    let sent = &query.calls_to("AddOrder")[0];
    assert_eq!(sent.get("pair").map(String::as_str), Some("XXLMZUSD"));
    assert_eq!(sent.get("type").map(String::as_str), Some("buy"));
    assert_eq!(sent.get("price").map(String::as_str), Some("0.123457"));
    assert_eq!(sent.get("volume").map(String::as_str), Some("40.00000000"));
    assert_eq!(query.call_count("QueryOrders"), 1);
}

#[tokio::test]
async fn fire_and_forget_skips_confirmation() {
    let (kraken, query) = kraken(ScriptedQuery::new().with_response(
        "AddOrder",
        json!({ "txid": ["OUF4EM-FRGI2-MQMWZD"] }),
    ));
    let order = Order::limit(pair("XLM/USD"), OrderAction::Sell, num("0.12"), num("40"));

    kraken.add_order(&order, SubmitMode::FireAndForget).await.unwrap();

    assert_eq!(query.call_count("QueryOrders"), 0);
}

#[tokio::test]
async fn rejected_order_status_is_an_error() {
    let (kraken, _) = kraken(
        ScriptedQuery::new()
            .with_response("AddOrder", json!({ "txid": ["OUF4EM-FRGI2-MQMWZD"] }))
            .with_response(
                "QueryOrders",
                json!({ "OUF4EM-FRGI2-MQMWZD": { "status": "canceled", "reason": "Insufficient funds" } }),
            ),
    );
    let order = Order::limit(pair("XLM/USD"), OrderAction::Buy, num("0.12"), num("40"));

    let err = kraken.add_order(&order, SubmitMode::Confirmed).await.unwrap_err();

    assert!(matches!(err, Error::OrderRejected(ref m) if m.contains("Insufficient funds")));
}

#[tokio::test]
async fn order_below_minimum_volume_is_never_sent() {
    let (kraken, query) = kraken(ScriptedQuery::new());
    let order = Order::limit(pair("XLM/USD"), OrderAction::Buy, num("0.12"), num("10"));

    let err = kraken.add_order(&order, SubmitMode::Confirmed).await.unwrap_err();

    assert!(matches!(err, Error::OrderRejected(_)));
    assert!(query.calls().is_empty());
}

#[tokio::test]
async fn cancel_reports_count_and_pending() {
    let (kraken, _) = kraken(
        ScriptedQuery::new()
            .with_response("CancelOrder", json!({ "count": 1 }))
            .with_response("CancelOrder", json!({ "count": 0, "pending": true }))
            .with_response("CancelOrder", json!({ "count": 0 })),
    );
    let txid = TransactionId::new("OUF4EM-FRGI2-MQMWZD");

    let mut results = Vec::new();
    for _ in 0..3 {
        results.push(kraken.cancel_order(&txid, &pair("XLM/USD")).await.unwrap());
    }

    assert_eq!(
        results,
        vec![
            CancelOrderResult::Cancelled,
            CancelOrderResult::Pending,
            CancelOrderResult::Failed
        ]
    );
}

#[tokio::test]
async fn deposit_forces_a_new_address_once() {
    let (kraken, query) = kraken(
        ScriptedQuery::new()
            .with_response("DepositMethods", bitcoin_method())
            .with_response(
                "DepositAddresses",
                json!([{ "address": "bc1-old", "expiretm": "0", "new": false }]),
            )
            .with_response(
                "DepositAddresses",
                json!([
                    { "address": "bc1-generated", "expiretm": "0", "new": true },
                    { "address": "bc1-old", "expiretm": "0" }
                ]),
            ),
    );

    let result = kraken
        .prepare_deposit(&Asset::new("BTC"), &num("0.5"))
        .await
        .unwrap();

    assert_eq!(result.address, "bc1-generated");
    let calls = query.calls_to("DepositAddresses");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].get("new"), None);
    assert_eq!(calls[1].get("new").map(String::as_str), Some("true"));
    assert_eq!(calls[1].get("asset").map(String::as_str), Some("XXBT"));
    assert_eq!(calls[1].get("method").map(String::as_str), Some("Bitcoin"));
}

#[tokio::test]
async fn repeated_deposits_reuse_the_fresh_address() {
    let listing = json!([
        { "address": "bc1-fresh", "expiretm": "0", "new": true },
        { "address": "bc1-old", "expiretm": "0", "new": false }
    ]);
    let (kraken, query) = kraken(
        ScriptedQuery::new()
            .with_response("DepositMethods", bitcoin_method())
            .with_response("DepositMethods", bitcoin_method())
            .with_response("DepositAddresses", listing.clone())
            .with_response("DepositAddresses", listing),
    );
    let btc = Asset::new("BTC");

    let first = kraken.prepare_deposit(&btc, &num("0.1")).await.unwrap();
    let second = kraken.prepare_deposit(&btc, &num("0.1")).await.unwrap();

    assert_eq!(first.address, "bc1-fresh");
    assert_eq!(second.address, "bc1-fresh");
    let calls = query.calls_to("DepositAddresses");
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|params| params.get("new").is_none()));
}

#[tokio::test]
async fn deposit_maps_kraken_pool_exhaustion() {
    let (kraken, _) = kraken(
        ScriptedQuery::new()
            .with_response("DepositMethods", bitcoin_method())
            .with_response("DepositAddresses", json!([]))
            .with_error("DepositAddresses", "EFunding:Too many addresses"),
    );

    let err = kraken
        .prepare_deposit(&Asset::new("BTC"), &num("0.5"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Deposit(DepositError::TooManyAddresses)));
}

#[tokio::test]
async fn withdraw_info_checks_limit_and_fee() {
    let info = json!({ "method": "Bitcoin", "limit": "1.5", "amount": "0.4995", "fee": "0.0005" });
    let (kraken, query) = kraken(
        ScriptedQuery::new()
            .with_response("WithdrawInfo", info.clone())
            .with_response("WithdrawInfo", info.clone())
            .with_response("WithdrawInfo", info),
    );
    let btc = Asset::new("BTC");

    let ok = kraken.get_withdraw_info(&btc, &num("0.5"), "cold-wallet").await.unwrap();
    assert_number_eq(&ok.amount_to_receive, "0.4995");
    assert_eq!(
        query.calls_to("WithdrawInfo")[0].get("key").map(String::as_str),
        Some("cold-wallet")
    );

    let above = kraken.get_withdraw_info(&btc, &num("2"), "cold-wallet").await.unwrap_err();
    assert!(matches!(above, Error::Withdraw(WithdrawError::AmountAboveLimit { .. })));

    let dust = kraken.get_withdraw_info(&btc, &num("0.0005"), "cold-wallet").await.unwrap_err();
    assert!(matches!(dust, Error::Withdraw(WithdrawError::AmountInvalid { .. })));
}

#[tokio::test]
async fn withdraw_returns_reference_id() {
    let (kraken, _) = kraken(
        ScriptedQuery::new().with_response("Withdraw", json!({ "refid": "AGBSO6T-UFMTTQ-I7KGS6" })),
    );

    let result = kraken
        .withdraw_funds(&Asset::new("BTC"), &num("0.5"), "cold-wallet")
        .await
        .unwrap();

    assert_eq!(result.withdrawal_id, "AGBSO6T-UFMTTQ-I7KGS6");
}

#[tokio::test]
async fn venue_errors_surface_unchanged() {
    let (kraken, _) = kraken(ScriptedQuery::new().with_error("Balance", "EAPI:Invalid nonce"));

    let err = kraken.get_account_balances(&[Asset::new("BTC")]).await.unwrap_err();

    assert!(matches!(err, Error::Venue(ref m) if m == "EAPI:Invalid nonce"));
}

#[test]
fn config_overrides_replace_default_constraints() {
    let config = Config::parse_toml(
        r#"
[deposit]
reservation_ttl_secs = 0

[constraint_overrides."XLM/USD"]
min_base_volume = "50"
"#,
    )
    .unwrap();

    let kraken = Kraken::from_config(Arc::new(ScriptedQuery::new()), &config).unwrap();
    let constraints = kraken.get_order_constraints(&pair("XLM/USD")).unwrap();

    assert_number_eq(&constraints.min_base_volume, "50");
    assert_eq!(constraints.price_precision, 6);
    assert!(!kraken.reservations().is_enabled());
}
