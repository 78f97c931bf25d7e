//! Capability-level fakes.
//!
//! Each fake scripts its responses up front through `with_*` builders and
//! records what it was asked, so tests drive the application protocols
//! without a venue transport.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::adapter::outbound::ledger::{ManageOfferMutator, SellOffer};
use crate::application::{ConstraintsTable, DepositSource};
use crate::domain::{
    Asset, AssetConverter, Cursor, DepositAddress, DepositMethod, Number, OrderBook,
    OrderConstraints, OrderConstraintsOverride, Trade, TradingPair,
};
use crate::error::{Error, Result};
use crate::port::{
    Balance, Constrainable, ExchangeShim, FillHandler, FillTrackable, OrderbookFetcher,
    SubmitCallback, SubmitMode, TradeFetcher, TradeHistoryResult,
};

type Page = std::result::Result<(Vec<Trade>, Cursor), String>;

/// Trade history served page by page.
///
/// Once the scripted pages run out every call returns no trades and echoes
/// the start cursor back, like a venue with nothing new to report.
pub struct ScriptedTradeFetcher {
    latest: Cursor,
    pages: Mutex<VecDeque<Page>>,
    starts: Mutex<Vec<Option<String>>>,
    latest_calls: AtomicUsize,
}

impl ScriptedTradeFetcher {
    /// Fetcher whose "now" anchor is `latest`.
    pub fn new(latest: &str) -> Self {
        Self {
            latest: Cursor::new(latest),
            pages: Mutex::new(VecDeque::new()),
            starts: Mutex::new(Vec::new()),
            latest_calls: AtomicUsize::new(0),
        }
    }

    /// Queue a page of trades followed by `cursor`.
    pub fn with_page(self, trades: Vec<Trade>, cursor: &str) -> Self {
        self.pages.lock().push_back(Ok((trades, Cursor::new(cursor))));
        self
    }

    /// Queue a failed history call.
    pub fn with_error(self, message: &str) -> Self {
        self.pages.lock().push_back(Err(message.to_string()));
        self
    }

    /// Start cursor of every history call, in order.
    pub fn history_starts(&self) -> Vec<Option<String>> {
        self.starts.lock().clone()
    }

    pub fn latest_cursor_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeFetcher for ScriptedTradeFetcher {
    async fn get_trade_history(
        &self,
        _pair: &TradingPair,
        cursor_start: Option<&Cursor>,
        _cursor_end: Option<&Cursor>,
    ) -> Result<TradeHistoryResult> {
        self.starts
            .lock()
            .push(cursor_start.map(|c| c.as_str().to_string()));

        match self.pages.lock().pop_front() {
            Some(Ok((trades, cursor))) => Ok(TradeHistoryResult { cursor, trades }),
            Some(Err(message)) => Err(Error::Venue(message)),
            None => Ok(TradeHistoryResult {
                cursor: cursor_start.cloned().unwrap_or_else(|| self.latest.clone()),
                trades: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl FillTrackable for ScriptedTradeFetcher {
    async fn get_latest_trade_cursor(&self) -> Result<Cursor> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.latest.clone())
    }
}

/// Fill handler that records every trade it is handed.
///
/// Handlers sharing a `log` append their name to it, which lets a test check
/// the order handlers were invoked in.
#[derive(Default)]
pub struct RecordingHandler {
    name: String,
    fail: bool,
    trades: Mutex<Vec<Trade>>,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the trade, then returns an error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Handler that appends `name` to `log` on every fill.
    pub fn named(name: &str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            log: Some(log),
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.trades.lock().len()
    }

    pub fn trades(&self) -> Vec<Trade> {
        self.trades.lock().clone()
    }

    pub fn transaction_ids(&self) -> Vec<String> {
        self.trades
            .lock()
            .iter()
            .map(|t| t.transaction_id().as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl FillHandler for RecordingHandler {
    async fn handle_fill(&self, trade: &Trade) -> Result<()> {
        self.trades.lock().push(trade.clone());
        if let Some(log) = &self.log {
            log.lock().push(self.name.clone());
        }
        if self.fail {
            return Err(Error::Venue(format!("handler rejected {}", trade.transaction_id())));
        }
        Ok(())
    }
}

type Listing = std::result::Result<Vec<DepositAddress>, String>;

/// Deposit source with scripted address listings.
///
/// Listings are served in the order they were queued; once they run out the
/// venue reports no addresses at all.
pub struct ScriptedDepositSource {
    assets: AssetConverter,
    method: DepositMethod,
    signal: Option<String>,
    listings: Mutex<VecDeque<Listing>>,
    listing_calls: Mutex<Vec<bool>>,
    method_calls: AtomicUsize,
}

impl ScriptedDepositSource {
    /// BTC on a venue that calls it `XXBT`, with an unlimited fee-free
    /// "Bitcoin" method that needs explicit address generation.
    pub fn bitcoin() -> Self {
        Self {
            assets: AssetConverter::new([(Asset::new("BTC"), "XXBT")]),
            method: DepositMethod {
                method: "Bitcoin".to_string(),
                limit: None,
                fee: Some(Number::zero(10).expect("zero is representable")),
                gen_address: true,
            },
            signal: None,
            listings: Mutex::new(VecDeque::new()),
            listing_calls: Mutex::new(Vec::new()),
            method_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_limit(mut self, limit: Number) -> Self {
        self.method.limit = Some(limit);
        self
    }

    pub fn with_fee(mut self, fee: Number) -> Self {
        self.method.fee = Some(fee);
        self
    }

    /// Queue one listing.
    pub fn with_listing(self, addresses: Vec<DepositAddress>) -> Self {
        self.listings.lock().push_back(Ok(addresses));
        self
    }

    /// Queue a failed listing carrying `message`.
    pub fn with_listing_error(self, message: &str) -> Self {
        self.listings.lock().push_back(Err(message.to_string()));
        self
    }

    /// Substring that marks a failed listing as "too many addresses".
    pub fn with_signal(mut self, signal: &str) -> Self {
        self.signal = Some(signal.to_string());
        self
    }

    /// `generate_new` of every listing call, in order.
    pub fn listing_calls(&self) -> Vec<bool> {
        self.listing_calls.lock().clone()
    }

    pub fn method_calls(&self) -> usize {
        self.method_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DepositSource for ScriptedDepositSource {
    fn asset_converter(&self) -> &AssetConverter {
        &self.assets
    }

    async fn deposit_method(&self, _venue_asset: &str) -> Result<DepositMethod> {
        self.method_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.method.clone())
    }

    async fn deposit_addresses(
        &self,
        _venue_asset: &str,
        _method: &DepositMethod,
        generate_new: bool,
    ) -> Result<Vec<DepositAddress>> {
        self.listing_calls.lock().push(generate_new);
        match self.listings.lock().pop_front() {
            Some(Ok(addresses)) => Ok(addresses),
            Some(Err(message)) => Err(Error::Venue(message)),
            None => Ok(Vec::new()),
        }
    }

    fn too_many_addresses_signal(&self) -> Option<&str> {
        self.signal.as_deref()
    }
}

/// Ledger-settled venue that accepts every batch.
///
/// Submitted batches are kept in order; each callback receives a synthetic
/// transaction hash `tx-<n>` where `n` counts batches from 1.
#[derive(Default)]
pub struct RecordingShim {
    constraints: ConstraintsTable,
    balances: HashMap<Asset, Balance>,
    offers: Vec<SellOffer>,
    batches: Mutex<Vec<(Vec<ManageOfferMutator>, SubmitMode)>>,
}

impl RecordingShim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraints(mut self, pair: TradingPair, constraints: OrderConstraints) -> Self {
        self.constraints = ConstraintsTable::new(HashMap::from([(pair, constraints)]));
        self
    }

    pub fn with_balance(mut self, asset: Asset, balance: Balance) -> Self {
        self.balances.insert(asset, balance);
        self
    }

    pub fn with_offer(mut self, offer: SellOffer) -> Self {
        self.offers.push(offer);
        self
    }

    pub fn batches(&self) -> Vec<(Vec<ManageOfferMutator>, SubmitMode)> {
        self.batches.lock().clone()
    }

    fn record(&self, ops: Vec<ManageOfferMutator>, submit_mode: SubmitMode) -> String {
        let mut batches = self.batches.lock();
        batches.push((ops, submit_mode));
        format!("tx-{}", batches.len())
    }
}

impl Constrainable for RecordingShim {
    fn get_order_constraints(&self, pair: &TradingPair) -> Option<OrderConstraints> {
        self.constraints.get(pair)
    }

    fn override_order_constraints(&self, pair: &TradingPair, over: &OrderConstraintsOverride) {
        self.constraints.set_override(pair, over);
    }
}

#[async_trait]
impl OrderbookFetcher for RecordingShim {
    async fn get_order_book(&self, pair: &TradingPair, _max_count: u32) -> Result<OrderBook> {
        Ok(OrderBook::new(pair.clone()))
    }
}

#[async_trait]
impl TradeFetcher for RecordingShim {
    async fn get_trade_history(
        &self,
        _pair: &TradingPair,
        cursor_start: Option<&Cursor>,
        _cursor_end: Option<&Cursor>,
    ) -> Result<TradeHistoryResult> {
        Ok(TradeHistoryResult {
            cursor: cursor_start.cloned().unwrap_or_else(|| Cursor::new("0")),
            trades: Vec::new(),
        })
    }
}

#[async_trait]
impl FillTrackable for RecordingShim {
    async fn get_latest_trade_cursor(&self) -> Result<Cursor> {
        Ok(Cursor::new("0"))
    }
}

#[async_trait]
impl ExchangeShim for RecordingShim {
    type Mutator = ManageOfferMutator;
    type Offer = SellOffer;

    async fn submit_ops(
        &self,
        ops: Vec<ManageOfferMutator>,
        submit_mode: SubmitMode,
        callback: Option<SubmitCallback>,
    ) -> Result<()> {
        let hash = self.record(ops, submit_mode);
        if let Some(callback) = callback {
            tokio::spawn(async move { callback(Ok(hash)) });
        }
        Ok(())
    }

    async fn submit_ops_sync(
        &self,
        ops: Vec<ManageOfferMutator>,
        submit_mode: SubmitMode,
        callback: Option<SubmitCallback>,
    ) -> Result<()> {
        let hash = self.record(ops, submit_mode);
        if let Some(callback) = callback {
            callback(Ok(hash));
        }
        Ok(())
    }

    async fn get_balance_hack(&self, asset: &Asset) -> Result<Balance> {
        self.balances
            .get(asset)
            .cloned()
            .ok_or_else(|| Error::Venue(format!("no trustline for {asset}")))
    }

    async fn load_offers_hack(&self) -> Result<Vec<SellOffer>> {
        Ok(self.offers.clone())
    }
}
