//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Venue adapters implement the capability traits; strategy code depends on
//! the narrowest capability it needs.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │   Strategy / Bot loop   │
//!                    └───────────┬─────────────┘
//!                                │ capability traits
//!                    ┌───────────▼─────────────┐
//!                    │  Application protocols  │
//!                    │ (fills, deposits, ...)  │
//!                    └───────────┬─────────────┘
//!                                │ RemoteQuery
//!     ┌──────────────────────────┼──────────────────────────┐
//!     ▼                          ▼                          ▼
//! ┌─────────┐             ┌─────────────┐            ┌────────────┐
//! │ Kraken  │             │  Other CEX  │            │ DEX (shim) │
//! │ Adapter │             │   Adapter   │            │  Adapter   │
//! └─────────┘             └─────────────┘            └────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`Account`], [`TickerApi`], [`OrderbookFetcher`], [`Constrainable`],
//!   [`TradeFetcher`], [`FillTrackable`], [`TradeApi`], [`DepositApi`],
//!   [`WithdrawApi`] - Venue capabilities
//! - [`Exchange`] - Every capability at once, implemented automatically
//! - [`ExchangeShim`] - Reduced contract for ledger-settled venues
//! - [`RemoteQuery`] - The only thing the core needs from a venue transport
//! - [`FillHandler`] - Consumer of tracked fills

mod exchange;
mod fill;
mod query;

pub use exchange::{
    Account, Balance, Constrainable, DepositApi, Exchange, ExchangeShim, FillTrackable,
    OrderbookFetcher, SubmitCallback, SubmitMode, Ticker, TickerApi, TradeApi, TradeFetcher,
    TradeHistoryResult, TradesResult, WithdrawApi,
};
pub use fill::FillHandler;
pub use query::{QueryParams, RemoteQuery};
