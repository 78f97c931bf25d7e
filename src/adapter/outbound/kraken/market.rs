use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{params, Kraken, KRAKEN_PRECISION};
use crate::application::parser::{expect_array, expect_object, value_as_number, ResponseMap};
use crate::domain::{Number, OrderBook, PriceLevel, TradingPair};
use crate::error::{Error, ParseError, Result};
use crate::port::{OrderbookFetcher, Ticker, TickerApi};

/// First element of an array field such as `"a": ["price", "lot", "vol"]`;
/// `None` when the field is absent or empty.
fn first_number(map: &ResponseMap, key: &str, context: &str) -> std::result::Result<Option<Number>, ParseError> {
    let Some(value) = map.get(key) else {
        return Ok(None);
    };
    let Some(first) = expect_array(value, context)?.first() else {
        return Ok(None);
    };
    value_as_number(first, key, context, KRAKEN_PRECISION).map(Some)
}

fn parse_levels(value: &Value, side: &str) -> std::result::Result<Vec<PriceLevel>, ParseError> {
    expect_array(value, "Depth")?
        .iter()
        .map(|entry| -> std::result::Result<PriceLevel, ParseError> {
            let entry = expect_array(entry, "Depth")?;
            let (Some(price), Some(volume)) = (entry.first(), entry.get(1)) else {
                return Err(ParseError::InvalidValue {
                    field: side.to_string(),
                    context: "Depth".to_string(),
                    reason: "level needs a price and a volume".to_string(),
                });
            };
            Ok(PriceLevel::new(
                value_as_number(price, side, "Depth", KRAKEN_PRECISION)?,
                value_as_number(volume, side, "Depth", KRAKEN_PRECISION)?,
            ))
        })
        .collect()
}

#[async_trait]
impl TickerApi for Kraken {
    async fn get_ticker_price(&self, pairs: &[TradingPair]) -> Result<HashMap<TradingPair, Ticker>> {
        let names: Vec<(TradingPair, String)> = pairs
            .iter()
            .filter_map(|pair| match self.pair_string(pair) {
                Ok(name) => Some((pair.clone(), name)),
                Err(e) => {
                    debug!(pair = %pair, error = %e, "Skipping ticker for unmapped pair");
                    None
                }
            })
            .collect();
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = names
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let response = self.query("Ticker", params([("pair", joined)])).await?;
        let tickers = expect_object(&response, "Ticker")?;

        let mut result = HashMap::with_capacity(names.len());
        for (pair, name) in names {
            let Some(entry) = tickers.get(&name) else {
                continue;
            };
            let entry = expect_object(entry, "Ticker")?;
            result.insert(
                pair,
                Ticker {
                    ask_price: first_number(entry, "a", "Ticker")?,
                    bid_price: first_number(entry, "b", "Ticker")?,
                    last_price: first_number(entry, "c", "Ticker")?,
                },
            );
        }
        Ok(result)
    }
}

#[async_trait]
impl OrderbookFetcher for Kraken {
    async fn get_order_book(&self, pair: &TradingPair, max_count: u32) -> Result<OrderBook> {
        let name = self.pair_string(pair)?;
        let response = self
            .query(
                "Depth",
                params([("pair", name.clone()), ("count", max_count.to_string())]),
            )
            .await?;
        let books = expect_object(&response, "Depth")?;
        let book = books
            .get(&name)
            .ok_or_else(|| Error::UnsupportedPair(pair.to_string()))?;
        let book = expect_object(book, "Depth")?;

        let bids = match book.get("bids") {
            Some(v) => parse_levels(v, "bids")?,
            None => Vec::new(),
        };
        let asks = match book.get("asks") {
            Some(v) => parse_levels(v, "asks")?,
            None => Vec::new(),
        };
        Ok(OrderBook::with_levels(pair.clone(), bids, asks).truncated(max_count as usize))
    }
}
