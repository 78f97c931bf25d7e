use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use tracing::{debug, info};

use super::{params, to_datetime, Kraken, KRAKEN_PRECISION};
use crate::application::parser::{
    expect_array, expect_object, optional, parse_array, parse_bool, parse_number, parse_object,
    parse_string, value_as_number, value_as_string, value_type_name, ResponseMap,
};
use crate::domain::{
    AssetConverter, CancelOrderResult, Cursor, Number, OpenOrder, Order, OrderAction, OrderType,
    Trade, TradingPair, TransactionId,
};
use crate::error::{Error, ParseError, Result};
use crate::port::{
    Constrainable, FillTrackable, QueryParams, SubmitMode, TradeApi, TradeFetcher,
    TradeHistoryResult, TradesResult,
};

type ParseResult<T> = std::result::Result<T, ParseError>;

fn parse_action(raw: &str, context: &str) -> ParseResult<OrderAction> {
    match raw {
        "buy" | "b" => Ok(OrderAction::Buy),
        "sell" | "s" => Ok(OrderAction::Sell),
        other => Err(ParseError::InvalidValue {
            field: "type".to_string(),
            context: context.to_string(),
            reason: format!("unknown order side '{other}'"),
        }),
    }
}

fn parse_order_type(raw: &str, context: &str) -> ParseResult<OrderType> {
    match raw {
        "limit" | "l" => Ok(OrderType::Limit),
        "market" | "m" => Ok(OrderType::Market),
        other => Err(ParseError::InvalidValue {
            field: "ordertype".to_string(),
            context: context.to_string(),
            reason: format!("unsupported order type '{other}'"),
        }),
    }
}

/// Kraken cursors arrive as strings or bare numbers.
fn cursor_from(value: &Value, field: &str, context: &str) -> ParseResult<Cursor> {
    match value {
        Value::String(s) => Ok(Cursor::new(s.as_str())),
        Value::Number(n) => Ok(Cursor::new(n.to_string())),
        other => Err(ParseError::TypeMismatch {
            field: field.to_string(),
            expected: "cursor",
            actual: value_type_name(other),
            context: context.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Cursor for a trade time, e.g. `1688667796.8802`.
fn time_cursor(time: &Number) -> Cursor {
    Cursor::new(time.as_decimal().normalize().to_string())
}

fn positional<'a>(fields: &'a [Value], index: usize, name: &str, context: &str) -> ParseResult<&'a Value> {
    fields.get(index).ok_or_else(|| ParseError::FieldNotFound {
        field: name.to_string(),
        context: context.to_string(),
    })
}

fn parse_history_trade(pair: &TradingPair, txid: &str, entry: &ResponseMap) -> ParseResult<(Number, Trade)> {
    const CONTEXT: &str = "TradesHistory";

    let time = parse_number(entry, "time", CONTEXT)?;
    let order = Order {
        pair: pair.clone(),
        action: parse_action(&parse_string(entry, "type", CONTEXT)?, CONTEXT)?,
        order_type: parse_order_type(&parse_string(entry, "ordertype", CONTEXT)?, CONTEXT)?,
        price: parse_number(entry, "price", CONTEXT)?,
        volume: parse_number(entry, "vol", CONTEXT)?,
        timestamp: to_datetime(&time),
    };

    let mut trade = Trade::new(order, TransactionId::new(txid));
    if let Some(order_id) = optional(parse_string(entry, "ordertxid", CONTEXT))? {
        trade = trade.with_order_id(TransactionId::new(order_id));
    }
    if let Some(cost) = optional(parse_number(entry, "cost", CONTEXT))? {
        trade = trade.with_cost(cost);
    }
    if let Some(fee) = optional(parse_number(entry, "fee", CONTEXT))? {
        trade = trade.with_fee(fee);
    }
    Ok((time, trade))
}

fn parse_public_trade(pair: &TradingPair, index: usize, entry: &Value) -> ParseResult<Trade> {
    const CONTEXT: &str = "Trades";

    // [price, volume, time, side, ordertype, misc, trade_id]
    let fields = expect_array(entry, CONTEXT)?;
    let price = value_as_number(positional(fields, 0, "price", CONTEXT)?, "price", CONTEXT, KRAKEN_PRECISION)?;
    let volume = value_as_number(positional(fields, 1, "volume", CONTEXT)?, "volume", CONTEXT, KRAKEN_PRECISION)?;
    let time = value_as_number(positional(fields, 2, "time", CONTEXT)?, "time", CONTEXT, KRAKEN_PRECISION)?;
    let side = value_as_string(positional(fields, 3, "side", CONTEXT)?, "side", CONTEXT)?;
    let kind = value_as_string(positional(fields, 4, "ordertype", CONTEXT)?, "ordertype", CONTEXT)?;

    let txid = match fields.get(6) {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("{}-{index}", time_cursor(&time)),
    };

    let order = Order {
        pair: pair.clone(),
        action: parse_action(&side, CONTEXT)?,
        order_type: parse_order_type(&kind, CONTEXT)?,
        price,
        volume,
        timestamp: to_datetime(&time),
    };
    Ok(Trade::new(order, TransactionId::new(txid)))
}

/// Pair an order description refers to, among those requested.
fn resolve_pair<'a>(
    wanted: &'a [(TradingPair, String, String)],
    described: &str,
) -> Option<&'a TradingPair> {
    wanted
        .iter()
        .find(|(_, api, display)| api == described || display == described)
        .map(|(pair, _, _)| pair)
}

fn parse_open_order(pair: &TradingPair, txid: &str, entry: &ResponseMap) -> ParseResult<OpenOrder> {
    const CONTEXT: &str = "OpenOrders";

    let descr = parse_object(entry, "descr", CONTEXT)?;
    let start = parse_number(entry, "opentm", CONTEXT)?;
    let expire = optional(parse_number(entry, "expiretm", CONTEXT))?.filter(|n| !n.is_zero());

    Ok(OpenOrder {
        order: Order {
            pair: pair.clone(),
            action: parse_action(&parse_string(descr, "type", CONTEXT)?, CONTEXT)?,
            order_type: parse_order_type(&parse_string(descr, "ordertype", CONTEXT)?, CONTEXT)?,
            price: parse_number(descr, "price", CONTEXT)?,
            volume: parse_number(entry, "vol", CONTEXT)?,
            timestamp: to_datetime(&start),
        },
        id: TransactionId::new(txid),
        start_time: to_datetime(&start),
        expire_time: expire.as_ref().and_then(to_datetime),
        volume_executed: parse_number(entry, "vol_exec", CONTEXT)?,
    })
}

impl Kraken {
    /// Confirm a just-submitted order is known to Kraken and not rejected.
    async fn confirm_order(&self, txid: &TransactionId) -> Result<()> {
        const CONTEXT: &str = "QueryOrders";

        let response = self
            .query(CONTEXT, params([("txid", txid.to_string())]))
            .await?;
        let orders = expect_object(&response, CONTEXT)?;
        let entry = parse_object(orders, txid.as_str(), CONTEXT)?;
        let status = parse_string(entry, "status", CONTEXT)?;

        match status.as_str() {
            "pending" | "open" | "closed" => {
                debug!(txid = %txid, status = %status, "Order confirmed");
                Ok(())
            }
            other => {
                let reason = optional(parse_string(entry, "reason", CONTEXT))?.unwrap_or_default();
                Err(Error::OrderRejected(format!("order {txid} is {other}: {reason}")))
            }
        }
    }
}

#[async_trait]
impl TradeFetcher for Kraken {
    async fn get_trade_history(
        &self,
        pair: &TradingPair,
        cursor_start: Option<&Cursor>,
        cursor_end: Option<&Cursor>,
    ) -> Result<TradeHistoryResult> {
        const CONTEXT: &str = "TradesHistory";

        let name = self.pair_string(pair)?;
        let mut base = QueryParams::new();
        if let Some(start) = cursor_start {
            base.insert("start".to_string(), start.as_str().to_string());
        }
        if let Some(end) = cursor_end {
            base.insert("end".to_string(), end.as_str().to_string());
        }

        let mut fills: Vec<(Number, Trade)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut offset = 0usize;
        loop {
            let mut query = base.clone();
            if offset > 0 {
                query.insert("ofs".to_string(), offset.to_string());
            }
            let response = self.query(CONTEXT, query).await?;
            let body = expect_object(&response, CONTEXT)?;
            let Some(page) = optional(parse_object(body, "trades", CONTEXT))? else {
                break;
            };

            for (txid, entry) in page {
                let entry = expect_object(entry, CONTEXT)?;
                if parse_string(entry, "pair", CONTEXT)? != name || !seen.insert(txid.clone()) {
                    continue;
                }
                fills.push(parse_history_trade(pair, txid, entry)?);
            }

            offset += page.len();
            let total = optional(parse_number(body, "count", CONTEXT))?
                .and_then(|n| n.as_decimal().to_usize());
            if page.is_empty() || total.map_or(true, |total| offset >= total) {
                break;
            }
        }

        fills.sort_by_key(|(time, _)| time.as_decimal());
        let cursor = fills
            .last()
            .map(|(time, _)| time_cursor(time))
            .or_else(|| cursor_start.cloned())
            .unwrap_or_else(|| Cursor::new("0"));

        Ok(TradeHistoryResult {
            cursor,
            trades: fills.into_iter().map(|(_, trade)| trade).collect(),
        })
    }
}

#[async_trait]
impl FillTrackable for Kraken {
    /// Time of the newest fill on the account, taken from Kraken so local
    /// clock skew cannot hide fills. An account without fills anchors at `0`.
    async fn get_latest_trade_cursor(&self) -> Result<Cursor> {
        const CONTEXT: &str = "TradesHistory";

        let response = self.query(CONTEXT, QueryParams::new()).await?;
        let body = expect_object(&response, CONTEXT)?;
        let Some(page) = optional(parse_object(body, "trades", CONTEXT))? else {
            return Ok(Cursor::new("0"));
        };

        let newest = page
            .values()
            .map(|entry| -> ParseResult<Number> {
                parse_number(expect_object(entry, CONTEXT)?, "time", CONTEXT)
            })
            .collect::<ParseResult<Vec<_>>>()?
            .into_iter()
            .max_by_key(|time| time.as_decimal());
        Ok(newest.map_or_else(|| Cursor::new("0"), |time| time_cursor(&time)))
    }
}

#[async_trait]
impl TradeApi for Kraken {
    fn asset_converter(&self) -> &AssetConverter {
        &self.assets
    }

    async fn get_trades(&self, pair: &TradingPair, cursor: Option<&Cursor>) -> Result<TradesResult> {
        const CONTEXT: &str = "Trades";

        let name = self.pair_string(pair)?;
        let mut query = params([("pair", name.clone())]);
        if let Some(since) = cursor {
            query.insert("since".to_string(), since.as_str().to_string());
        }

        let response = self.query(CONTEXT, query).await?;
        let body = expect_object(&response, CONTEXT)?;
        let entries = body
            .get(&name)
            .ok_or_else(|| Error::UnsupportedPair(pair.to_string()))?;

        let trades = expect_array(entries, CONTEXT)?
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_public_trade(pair, index, entry))
            .collect::<ParseResult<Vec<_>>>()?;

        let cursor = match body.get("last") {
            Some(last) => cursor_from(last, "last", CONTEXT)?,
            None => cursor.cloned().unwrap_or_else(|| Cursor::new("0")),
        };
        Ok(TradesResult { cursor, trades })
    }

    async fn get_open_orders(&self, pairs: &[TradingPair]) -> Result<HashMap<TradingPair, Vec<OpenOrder>>> {
        const CONTEXT: &str = "OpenOrders";

        let wanted = pairs
            .iter()
            .map(|pair| -> Result<(TradingPair, String, String)> {
                Ok((
                    pair.clone(),
                    self.pair_string(pair)?,
                    pair.to_venue_string(&self.display_assets, "")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let response = self.query(CONTEXT, QueryParams::new()).await?;
        let body = expect_object(&response, CONTEXT)?;
        let Some(open) = optional(parse_object(body, "open", CONTEXT))? else {
            return Ok(HashMap::new());
        };

        let mut result: HashMap<TradingPair, Vec<OpenOrder>> = HashMap::new();
        for (txid, entry) in open {
            let entry = expect_object(entry, CONTEXT)?;
            let described = parse_string(parse_object(entry, "descr", CONTEXT)?, "pair", CONTEXT)?;
            let Some(pair) = resolve_pair(&wanted, &described) else {
                continue;
            };
            let order = parse_open_order(pair, txid, entry)?;
            result.entry(pair.clone()).or_default().push(order);
        }
        for orders in result.values_mut() {
            orders.sort_by_key(|o| o.start_time);
        }
        Ok(result)
    }

    async fn add_order(&self, order: &Order, submit_mode: SubmitMode) -> Result<TransactionId> {
        const CONTEXT: &str = "AddOrder";

        let constraints = self
            .get_order_constraints(&order.pair)
            .ok_or_else(|| Error::UnsupportedPair(order.pair.to_string()))?;
        let price = order.price.round_to(constraints.price_precision)?;
        let volume = order.volume.round_to(constraints.volume_precision)?;

        if volume < constraints.min_base_volume {
            return Err(Error::OrderRejected(format!(
                "volume {volume} is below the minimum {} for {}",
                constraints.min_base_volume, order.pair
            )));
        }
        if let Some(min_quote) = constraints.min_quote_volume {
            let quote = price.mul(&volume);
            if quote < min_quote {
                return Err(Error::OrderRejected(format!(
                    "quote volume {quote} is below the minimum {min_quote} for {}",
                    order.pair
                )));
            }
        }

        let mut query = params([
            ("pair", self.pair_string(&order.pair)?),
            ("type", order.action.to_string()),
            ("ordertype", order.order_type.to_string()),
            ("volume", volume.as_string()),
        ]);
        if order.order_type == OrderType::Limit {
            query.insert("price".to_string(), price.as_string());
        }

        let response = self.query(CONTEXT, query).await?;
        let body = expect_object(&response, CONTEXT)?;
        let txid = parse_array(body, "txid", CONTEXT)?
            .first()
            .ok_or_else(|| ParseError::InvalidValue {
                field: "txid".to_string(),
                context: CONTEXT.to_string(),
                reason: "no transaction id returned".to_string(),
            })
            .and_then(|id| value_as_string(id, "txid", CONTEXT))?;
        let txid = TransactionId::new(txid);

        info!(
            pair = %order.pair,
            action = %order.action,
            price = %price,
            volume = %volume,
            txid = %txid,
            mode = %submit_mode,
            "Submitted order"
        );

        if submit_mode == SubmitMode::Confirmed {
            self.confirm_order(&txid).await?;
        }
        Ok(txid)
    }

    async fn cancel_order(&self, tx_id: &TransactionId, pair: &TradingPair) -> Result<CancelOrderResult> {
        const CONTEXT: &str = "CancelOrder";

        let response = self
            .query(CONTEXT, params([("txid", tx_id.to_string())]))
            .await?;
        let body = expect_object(&response, CONTEXT)?;

        let cancelled = optional(parse_number(body, "count", CONTEXT))?.is_some_and(|n| n.is_positive());
        let result = if cancelled {
            CancelOrderResult::Cancelled
        } else if optional(parse_bool(body, "pending", CONTEXT))?.unwrap_or(false) {
            CancelOrderResult::Pending
        } else {
            CancelOrderResult::Failed
        };
        debug!(pair = %pair, txid = %tx_id, result = %result, "Cancel order");
        Ok(result)
    }
}
