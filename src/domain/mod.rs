//! Venue-agnostic value objects.
//!
//! Everything here is immutable once built and safe to share across tasks
//! without locking.

pub mod error;

mod asset;
mod constraints;
mod funding;
mod number;
mod order;
mod order_book;
mod pair;
mod trade;

pub use asset::{Asset, AssetConverter};
pub use constraints::{OrderConstraints, OrderConstraintsOverride};
pub use funding::{DepositAddress, DepositMethod, PrepareDepositResult, WithdrawFunds, WithdrawInfo};
pub use number::{Number, MAX_PRECISION};
pub use order::{CancelOrderResult, OpenOrder, Order, OrderAction, OrderType, TransactionId};
pub use order_book::{OrderBook, PriceLevel};
pub use pair::TradingPair;
pub use trade::{Cursor, Trade};
