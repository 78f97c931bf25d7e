//! Exchange capability ports.
//!
//! "An exchange" is decomposed into narrow capabilities so that a venue
//! implements only what it supports and strategy code can ask for only what
//! it uses. [`Exchange`] is the intersection of the full set and is
//! implemented automatically for any type that has all of them.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    Asset, AssetConverter, CancelOrderResult, Cursor, Number, OpenOrder, Order, OrderBook,
    OrderConstraints, OrderConstraintsOverride, PrepareDepositResult, Trade, TradingPair,
    TransactionId, WithdrawFunds, WithdrawInfo,
};
use crate::error::Error;

/// Account balances.
#[async_trait]
pub trait Account: Send + Sync {
    /// Balances for the requested assets.
    ///
    /// Fails if any requested asset is unknown to the venue.
    async fn get_account_balances(&self, assets: &[Asset]) -> Result<HashMap<Asset, Number>, Error>;
}

/// Top-of-book prices for a trading pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    pub ask_price: Option<Number>,
    pub bid_price: Option<Number>,
    pub last_price: Option<Number>,
}

/// Ticker reads.
#[async_trait]
pub trait TickerApi: Send + Sync {
    /// Tickers for the pairs the venue could resolve.
    ///
    /// A missing pair in the result is not an error.
    async fn get_ticker_price(
        &self,
        pairs: &[TradingPair],
    ) -> Result<HashMap<TradingPair, Ticker>, Error>;
}

/// Order book reads.
#[async_trait]
pub trait OrderbookFetcher: Send + Sync {
    /// Order book with at most `max_count` levels per side.
    async fn get_order_book(&self, pair: &TradingPair, max_count: u32) -> Result<OrderBook, Error>;
}

/// Per-pair order constraints.
pub trait Constrainable: Send + Sync {
    /// `None` when the venue knows no constraint for the pair.
    fn get_order_constraints(&self, pair: &TradingPair) -> Option<OrderConstraints>;

    /// Replace constraint fields for a pair; last write wins per field.
    fn override_order_constraints(&self, pair: &TradingPair, over: &OrderConstraintsOverride);
}

/// Trades plus the cursor to resume from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeHistoryResult {
    pub cursor: Cursor,
    pub trades: Vec<Trade>,
}

/// Result of a public trades query. Same shape as [`TradeHistoryResult`].
pub type TradesResult = TradeHistoryResult;

/// Account trade history.
#[async_trait]
pub trait TradeFetcher: Send + Sync {
    /// Account trades for `pair` after `cursor_start`, up to `cursor_end`
    /// (`None` means up to now), in venue order.
    async fn get_trade_history(
        &self,
        pair: &TradingPair,
        cursor_start: Option<&Cursor>,
        cursor_end: Option<&Cursor>,
    ) -> Result<TradeHistoryResult, Error>;
}

/// Trade history with a "now" anchor, enough to drive a fill tracker.
#[async_trait]
pub trait FillTrackable: TradeFetcher {
    /// Cursor for the most recent point in the trade history, so a tracker
    /// starting now does not replay old fills.
    async fn get_latest_trade_cursor(&self) -> Result<Cursor, Error>;
}

/// How an order submission completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    /// Return only once the venue has confirmed the order.
    #[default]
    Confirmed,
    /// Return as soon as the venue accepted the request.
    FireAndForget,
}

impl fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::FireAndForget => write!(f, "fire-and-forget"),
        }
    }
}

/// Trading on a venue.
#[async_trait]
pub trait TradeApi: Constrainable + OrderbookFetcher + FillTrackable {
    /// Converter between assets and this venue's symbols.
    fn asset_converter(&self) -> &AssetConverter;

    /// Public trades for `pair` after `cursor`.
    async fn get_trades(
        &self,
        pair: &TradingPair,
        cursor: Option<&Cursor>,
    ) -> Result<TradesResult, Error>;

    /// Open orders grouped by pair; pairs with no open orders may be absent.
    async fn get_open_orders(
        &self,
        pairs: &[TradingPair],
    ) -> Result<HashMap<TradingPair, Vec<OpenOrder>>, Error>;

    /// Submit an order.
    async fn add_order(&self, order: &Order, submit_mode: SubmitMode) -> Result<TransactionId, Error>;

    /// Cancel an order.
    async fn cancel_order(
        &self,
        tx_id: &TransactionId,
        pair: &TradingPair,
    ) -> Result<CancelOrderResult, Error>;
}

/// Depositing funds.
#[async_trait]
pub trait DepositApi: Send + Sync {
    /// Deposit instructions for `amount` of `asset`.
    ///
    /// Fails with [`DepositError`](crate::error::DepositError) for
    /// above-limit amounts and exhausted address pools.
    async fn prepare_deposit(&self, asset: &Asset, amount: &Number) -> Result<PrepareDepositResult, Error>;
}

/// Withdrawing funds.
#[async_trait]
pub trait WithdrawApi: Send + Sync {
    /// Estimate what arrives at `address` when withdrawing `amount` from the
    /// account.
    ///
    /// Fails with [`WithdrawError`](crate::error::WithdrawError) for
    /// above-limit amounts and amounts that do not cover the fee.
    async fn get_withdraw_info(
        &self,
        asset: &Asset,
        amount: &Number,
        address: &str,
    ) -> Result<WithdrawInfo, Error>;

    /// Withdraw `amount` (fees included) to `address`.
    async fn withdraw_funds(
        &self,
        asset: &Asset,
        amount: &Number,
        address: &str,
    ) -> Result<WithdrawFunds, Error>;
}

/// Every capability a full custodial exchange offers.
pub trait Exchange: Account + TickerApi + TradeApi + DepositApi + WithdrawApi {}

impl<T> Exchange for T where T: Account + TickerApi + TradeApi + DepositApi + WithdrawApi {}

/// Account balance on a ledger-settled venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub balance: Number,
    pub trust: Number,
    pub reserve: Number,
}

/// Invoked once an asynchronously submitted batch settles, with the ledger
/// transaction hash or the failure.
pub type SubmitCallback = Box<dyn FnOnce(Result<String, Error>) + Send>;

/// Reduced contract for venues whose settlement is asynchronous and batched.
///
/// Orders are expressed as an opaque batch of transaction mutators produced
/// by an external transaction builder; this port never inspects them and
/// preserves their order.
#[async_trait]
pub trait ExchangeShim: Constrainable + OrderbookFetcher + FillTrackable {
    /// Opaque unit of transaction construction.
    type Mutator: Send + 'static;
    /// Venue-native resting offer.
    type Offer: Send + 'static;

    /// Submit a batch; the callback fires when it settles.
    async fn submit_ops(
        &self,
        ops: Vec<Self::Mutator>,
        submit_mode: SubmitMode,
        callback: Option<SubmitCallback>,
    ) -> Result<(), Error>;

    /// Like [`submit_ops`](Self::submit_ops) but does not return until the
    /// batch is submitted.
    async fn submit_ops_sync(
        &self,
        ops: Vec<Self::Mutator>,
        submit_mode: SubmitMode,
        callback: Option<SubmitCallback>,
    ) -> Result<(), Error>;

    async fn get_balance_hack(&self, asset: &Asset) -> Result<Balance, Error>;

    async fn load_offers_hack(&self) -> Result<Vec<Self::Offer>, Error>;
}
