//! Kraken exchange integration.
//!
//! [`Kraken`] implements every capability port on top of a [`RemoteQuery`]
//! transport. The transport signs requests and strips Kraken's
//! `{"error": [...], "result": ...}` envelope, returning venue errors as
//! [`Error::Venue`](crate::error::Error::Venue) with Kraken's message intact
//! (e.g. `EFunding:Too many addresses`).
//!
//! Module layout follows the capability ports:
//!
//! - [`assets`] - Symbol tables and default order constraints
//! - `account` - [`Account`](crate::port::Account)
//! - `market` - [`TickerApi`](crate::port::TickerApi) and
//!   [`OrderbookFetcher`](crate::port::OrderbookFetcher)
//! - `trading` - [`TradeFetcher`](crate::port::TradeFetcher),
//!   [`FillTrackable`](crate::port::FillTrackable) and
//!   [`TradeApi`](crate::port::TradeApi)
//! - [`deposit`] - [`DepositSource`](crate::application::DepositSource)
//! - `withdraw` - [`WithdrawApi`](crate::port::WithdrawApi)

pub mod assets;
pub mod deposit;

mod account;
mod market;
mod trading;
mod withdraw;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use self::deposit::KrakenDepositSource;
use crate::application::parser::NUMBER_PRECISION;
use crate::application::{AddressReservations, ConstraintsTable, DepositManager};
use crate::domain::{
    Asset, AssetConverter, Number, OrderConstraints, OrderConstraintsOverride,
    PrepareDepositResult, TradingPair,
};
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;
use crate::port::{Constrainable, DepositApi, QueryParams, RemoteQuery};

/// Error Kraken returns when an account holds the maximum number of
/// deposit addresses for an asset.
pub const TOO_MANY_ADDRESSES: &str = "EFunding:Too many addresses";

/// Precision of every number read from a Kraken response.
pub const KRAKEN_PRECISION: u32 = NUMBER_PRECISION;

/// Kraken venue adapter.
pub struct Kraken {
    api: Arc<dyn RemoteQuery>,
    assets: AssetConverter,
    display_assets: AssetConverter,
    constraints: ConstraintsTable,
    deposits: DepositManager<KrakenDepositSource>,
}

impl Kraken {
    /// Adapter without address reservations: a fresh address is handed out
    /// until Kraken stops listing it as new.
    pub fn new(api: Arc<dyn RemoteQuery>) -> Self {
        Self::with_reservations(api, Arc::new(AddressReservations::disabled()))
    }

    /// Adapter sharing `reservations` with other handles on the same account.
    pub fn with_reservations(api: Arc<dyn RemoteQuery>, reservations: Arc<AddressReservations>) -> Self {
        let source = KrakenDepositSource::new(Arc::clone(&api), assets::asset_converter());
        Self {
            api,
            assets: assets::asset_converter(),
            display_assets: assets::display_converter(),
            constraints: ConstraintsTable::new(assets::default_constraints()),
            deposits: DepositManager::with_reservations(source, reservations),
        }
    }

    /// Adapter configured from `config`: reservation TTL and constraint
    /// overrides.
    pub fn from_config(api: Arc<dyn RemoteQuery>, config: &Config) -> Result<Self> {
        let kraken = Self::with_reservations(api, Arc::new(config.deposit.reservations()));
        config.apply_constraint_overrides(&kraken)?;
        Ok(kraken)
    }

    /// Converter for pair names in order descriptions (`XBTUSD`).
    pub fn display_converter(&self) -> &AssetConverter {
        &self.display_assets
    }

    pub fn reservations(&self) -> &Arc<AddressReservations> {
        self.deposits.reservations()
    }

    /// Kraken pair name, e.g. `XXBTZUSD`.
    pub fn pair_string(&self, pair: &TradingPair) -> Result<String> {
        Ok(pair.to_venue_string(&self.assets, "")?)
    }

    async fn query(&self, method: &str, params: QueryParams) -> Result<serde_json::Value> {
        self.api.query(method, &params).await
    }
}

impl Constrainable for Kraken {
    fn get_order_constraints(&self, pair: &TradingPair) -> Option<OrderConstraints> {
        self.constraints.get(pair)
    }

    fn override_order_constraints(&self, pair: &TradingPair, over: &OrderConstraintsOverride) {
        self.constraints.set_override(pair, over);
    }
}

#[async_trait]
impl DepositApi for Kraken {
    async fn prepare_deposit(&self, asset: &Asset, amount: &Number) -> Result<PrepareDepositResult> {
        self.deposits.prepare_deposit(asset, amount).await
    }
}

fn params<const N: usize>(entries: [(&str, String); N]) -> QueryParams {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Kraken timestamps are fractional unix seconds.
fn to_datetime(seconds: &Number) -> Option<DateTime<Utc>> {
    let millis = seconds
        .as_decimal()
        .checked_mul(Decimal::from(1000))?
        .trunc()
        .to_i64()?;
    Utc.timestamp_millis_opt(millis).single()
}
