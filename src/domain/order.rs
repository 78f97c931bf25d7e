//! Orders as created by strategy code and as reported back by a venue.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::number::Number;
use super::pair::TradingPair;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    /// Buy the base asset.
    Buy,
    /// Sell the base asset.
    Sell,
}

impl OrderAction {
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }

    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }

    /// The opposite side.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "limit"),
            Self::Market => write!(f, "market"),
        }
    }
}

/// Unique identifier for an order or trade on a venue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a new `TransactionId`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// An order to be placed, or the order side of a reported fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub pair: TradingPair,
    pub action: OrderAction,
    pub order_type: OrderType,
    pub price: Number,
    pub volume: Number,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Order {
    /// A limit order without a timestamp.
    #[must_use]
    pub fn limit(pair: TradingPair, action: OrderAction, price: Number, volume: Number) -> Self {
        Self {
            pair,
            action,
            order_type: OrderType::Limit,
            price,
            volume,
            timestamp: None,
        }
    }

    /// Price times volume.
    #[must_use]
    pub fn quote_volume(&self) -> Number {
        self.price.mul(&self.volume)
    }
}

/// An order resting on a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOrder {
    pub order: Order,
    pub id: TransactionId,
    pub start_time: Option<DateTime<Utc>>,
    pub expire_time: Option<DateTime<Utc>>,
    pub volume_executed: Number,
}

/// Outcome of a cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOrderResult {
    /// The venue confirmed the cancellation.
    Cancelled,
    /// The venue accepted the request but has not completed it yet.
    Pending,
    /// The venue did not cancel the order.
    Failed,
}

impl fmt::Display for CancelOrderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::Pending => write!(f, "pending"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
