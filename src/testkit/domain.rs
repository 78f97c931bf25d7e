//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`Number`], [`TradingPair`],
//! [`Trade`] and [`DepositAddress`] so tests focus on assertions rather than
//! construction boilerplate.

use crate::domain::{
    DepositAddress, Number, Order, OrderAction, Trade, TradingPair, TransactionId,
};

/// Parse `s` at precision 10.
pub fn num(s: &str) -> Number {
    Number::parse(s, 10).expect("test number must parse")
}

/// Parse a `"BASE/QUOTE"` pair.
pub fn pair(s: &str) -> TradingPair {
    s.parse().expect("test pair must parse")
}

/// Buy limit order on XLM/USD.
pub fn limit_order(price: &str, volume: &str) -> Order {
    Order::limit(pair("XLM/USD"), OrderAction::Buy, num(price), num(volume))
}

/// A 10 XLM buy fill at `price`, identified by `txid`.
pub fn trade(txid: &str, price: &str) -> Trade {
    Trade::new(limit_order(price, "10"), TransactionId::new(txid))
}

/// A deposit address that never expires.
pub fn address(addr: &str, is_new: bool) -> DepositAddress {
    DepositAddress::new(addr, 0, is_new)
}
