//! Order book types.

use super::number::Number;
use super::pair::TradingPair;

/// A single price level in the order book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    price: Number,
    volume: Number,
}

impl PriceLevel {
    /// Create a new price level
    #[must_use]
    pub const fn new(price: Number, volume: Number) -> Self {
        Self { price, volume }
    }

    /// Get the price
    #[must_use]
    pub const fn price(&self) -> &Number {
        &self.price
    }

    /// Get the volume in base units
    #[must_use]
    pub const fn volume(&self) -> &Number {
        &self.volume
    }
}

/// Order book for a single trading pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    pair: TradingPair,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Create a new empty order book
    #[must_use]
    pub const fn new(pair: TradingPair) -> Self {
        Self {
            pair,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Create an order book with initial levels, bids best-first and asks
    /// best-first.
    #[must_use]
    pub const fn with_levels(pair: TradingPair, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { pair, bids, asks }
    }

    /// Get the trading pair
    #[must_use]
    pub const fn pair(&self) -> &TradingPair {
        &self.pair
    }

    /// Get all bid levels
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Get all ask levels
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Best bid (highest buy price)
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best ask (lowest sell price)
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Keep at most `max_count` levels per side.
    #[must_use]
    pub fn truncated(mut self, max_count: usize) -> Self {
        self.bids.truncate(max_count);
        self.asks.truncate(max_count);
        self
    }
}
