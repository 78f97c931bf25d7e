//! Executed fills and the cursors that locate them in a venue's history.
//!
//! - [`Trade`] - Immutable record of one fill, produced by a venue and
//!   dispatched to fill handlers
//! - [`Cursor`] - Opaque venue-defined position in a trade history
//!
//! # Examples
//!
//! ```
//! use venuekit::domain::{Number, Order, OrderAction, Trade, TradingPair, TransactionId};
//!
//! let order = Order::limit(
//!     TradingPair::new("BTC", "USD"),
//!     OrderAction::Sell,
//!     Number::parse("30000", 10).unwrap(),
//!     Number::parse("0.5", 10).unwrap(),
//! );
//! let trade = Trade::new(order, TransactionId::new("T-1"));
//!
//! assert_eq!(trade.transaction_id().as_str(), "T-1");
//! assert!(trade.fee().is_none());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::number::Number;
use super::order::{Order, OrderAction, TransactionId};
use super::pair::TradingPair;

/// Opaque, venue-defined position in a trade history.
///
/// Only the venue that issued a cursor can interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Cursor {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Cursor {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Immutable record of an executed fill.
///
/// Fields are private; a trade is built once by the venue adapter and only
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    order: Order,
    transaction_id: TransactionId,
    order_id: Option<TransactionId>,
    cost: Option<Number>,
    fee: Option<Number>,
}

impl Trade {
    /// Creates a fill for `order` identified by the venue's trade id.
    #[must_use]
    pub fn new(order: Order, transaction_id: TransactionId) -> Self {
        Self {
            order,
            transaction_id,
            order_id: None,
            cost: None,
            fee: None,
        }
    }

    /// Attach the id of the order this fill belongs to.
    #[must_use]
    pub fn with_order_id(mut self, order_id: TransactionId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Attach the quote-denominated cost reported by the venue.
    #[must_use]
    pub fn with_cost(mut self, cost: Number) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Attach the fee charged for this fill.
    #[must_use]
    pub fn with_fee(mut self, fee: Number) -> Self {
        self.fee = Some(fee);
        self
    }

    #[must_use]
    pub const fn order(&self) -> &Order {
        &self.order
    }

    #[must_use]
    pub const fn pair(&self) -> &TradingPair {
        &self.order.pair
    }

    #[must_use]
    pub const fn action(&self) -> OrderAction {
        self.order.action
    }

    #[must_use]
    pub const fn price(&self) -> &Number {
        &self.order.price
    }

    #[must_use]
    pub const fn volume(&self) -> &Number {
        &self.order.volume
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.order.timestamp
    }

    /// Venue-native id of this fill.
    #[must_use]
    pub const fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    #[must_use]
    pub const fn order_id(&self) -> Option<&TransactionId> {
        self.order_id.as_ref()
    }

    #[must_use]
    pub const fn cost(&self) -> Option<&Number> {
        self.cost.as_ref()
    }

    #[must_use]
    pub const fn fee(&self) -> Option<&Number> {
        self.fee.as_ref()
    }
}
