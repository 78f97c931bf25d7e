use std::sync::Arc;

use serde_json::{json, Value};
use venuekit::adapter::outbound::kraken::Kraken;
use venuekit::testkit::ScriptedQuery;

/// Kraken on top of `query`, keeping a handle for call inspection.
pub fn kraken(query: ScriptedQuery) -> (Kraken, Arc<ScriptedQuery>) {
    let query = Arc::new(query);
    (Kraken::new(query.clone()), query)
}

/// One `TradesHistory` entry.
pub fn history_entry(pair: &str, side: &str, price: &str, vol: &str, time: &str) -> Value {
    json!({
        "ordertxid": "OQCLML-BW3P3-BUCMWZ",
        "pair": pair,
        "time": time,
        "type": side,
        "ordertype": "limit",
        "price": price,
        "cost": "1.2000000000",
        "fee": "0.0031200000",
        "vol": vol,
    })
}

pub fn bitcoin_method() -> Value {
    json!([{
        "method": "Bitcoin",
        "limit": false,
        "fee": "0.0000000000",
        "gen-address": true
    }])
}
