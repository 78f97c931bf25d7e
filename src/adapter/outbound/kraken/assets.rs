//! Kraken symbol tables and default order constraints.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::{Asset, AssetConverter, Number, OrderConstraints, TradingPair};

const SYMBOLS: [(&str, &str, &str); 8] = [
    // (asset, API symbol, display symbol)
    ("BTC", "XXBT", "XBT"),
    ("ETH", "XETH", "ETH"),
    ("LTC", "XLTC", "LTC"),
    ("XLM", "XXLM", "XLM"),
    ("XRP", "XXRP", "XRP"),
    ("USD", "ZUSD", "USD"),
    ("EUR", "ZEUR", "EUR"),
    ("USDT", "USDT", "USDT"),
];

/// Converter for API asset codes (`XXBT`, `ZUSD`).
pub fn asset_converter() -> AssetConverter {
    AssetConverter::new(SYMBOLS.iter().map(|(asset, api, _)| (Asset::new(asset), *api)))
}

/// Converter for display codes used in order descriptions (`XBT`, `USD`).
pub fn display_converter() -> AssetConverter {
    AssetConverter::new(
        SYMBOLS
            .iter()
            .map(|(asset, _, display)| (Asset::new(asset), *display)),
    )
}

/// (base, quote, price precision, volume precision, min base volume)
const CONSTRAINTS: [(&str, &str, u32, u32, Decimal); 10] = [
    ("XLM", "USD", 6, 8, Decimal::from_parts(30, 0, 0, false, 0)),
    ("XLM", "BTC", 8, 8, Decimal::from_parts(30, 0, 0, false, 0)),
    ("XLM", "EUR", 6, 8, Decimal::from_parts(30, 0, 0, false, 0)),
    ("BTC", "USD", 1, 8, Decimal::from_parts(2, 0, 0, false, 3)),
    ("BTC", "EUR", 1, 8, Decimal::from_parts(2, 0, 0, false, 3)),
    ("ETH", "USD", 2, 8, Decimal::from_parts(2, 0, 0, false, 2)),
    ("ETH", "BTC", 5, 8, Decimal::from_parts(2, 0, 0, false, 2)),
    ("LTC", "USD", 2, 8, Decimal::from_parts(1, 0, 0, false, 1)),
    ("XRP", "USD", 5, 8, Decimal::from_parts(30, 0, 0, false, 0)),
    ("USDT", "USD", 4, 8, Decimal::from_parts(5, 0, 0, false, 0)),
];

/// Constraints Kraken publishes for the pairs above.
pub fn default_constraints() -> HashMap<TradingPair, OrderConstraints> {
    CONSTRAINTS
        .iter()
        .filter_map(|&(base, quote, price_precision, volume_precision, min_base)| {
            let min_base_volume = Number::new(min_base, volume_precision).ok()?;
            Some((
                TradingPair::new(base, quote),
                OrderConstraints::new(price_precision, volume_precision, min_base_volume, None),
            ))
        })
        .collect()
}
