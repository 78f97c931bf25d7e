//! Kraken side of deposit address acquisition.
//!
//! `DepositMethods` reports `limit` as `false` (no limit) or a number, and
//! may leave `fee` out. `DepositAddresses` lists newest first and only
//! treats `new` as a request to generate when it is present at all, so it
//! is sent only when forcing generation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{params, TOO_MANY_ADDRESSES};
use crate::application::parser::{
    expect_array, expect_object, optional, parse_bool, parse_number, parse_string, ResponseMap,
};
use crate::application::DepositSource;
use crate::domain::{AssetConverter, DepositAddress, DepositMethod, Number};
use crate::error::{ParseError, Result};
use crate::port::RemoteQuery;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Reads deposit methods and addresses through Kraken's API.
pub struct KrakenDepositSource {
    api: Arc<dyn RemoteQuery>,
    assets: AssetConverter,
}

impl KrakenDepositSource {
    pub fn new(api: Arc<dyn RemoteQuery>, assets: AssetConverter) -> Self {
        Self { api, assets }
    }
}

/// `limit` is either `false` or a number; `true` is never valid.
fn parse_limit(map: &ResponseMap) -> ParseResult<Option<Number>> {
    const CONTEXT: &str = "DepositMethods";
    match parse_bool(map, "limit", CONTEXT) {
        Ok(false) => Ok(None),
        Ok(true) => Err(ParseError::InvalidValue {
            field: "limit".to_string(),
            context: CONTEXT.to_string(),
            reason: "boolean limit should never be true, a limit is reported as a number".to_string(),
        }),
        Err(e) if e.is_field_not_found() => Err(e),
        Err(_) => parse_number(map, "limit", CONTEXT).map(Some),
    }
}

pub(crate) fn parse_deposit_method(map: &ResponseMap) -> ParseResult<DepositMethod> {
    const CONTEXT: &str = "DepositMethods";
    Ok(DepositMethod {
        method: parse_string(map, "method", CONTEXT)?,
        limit: parse_limit(map)?,
        fee: optional(parse_number(map, "fee", CONTEXT))?,
        gen_address: parse_bool(map, "gen-address", CONTEXT)?,
    })
}

pub(crate) fn parse_deposit_address(map: &ResponseMap) -> ParseResult<DepositAddress> {
    const CONTEXT: &str = "DepositAddresses";
    let expire = parse_number(map, "expiretm", CONTEXT)?;
    Ok(DepositAddress {
        address: parse_string(map, "address", CONTEXT)?,
        expire_ts: expire.as_f64() as i64,
        is_new: optional(parse_bool(map, "new", CONTEXT))?.unwrap_or(false),
    })
}

#[async_trait]
impl DepositSource for KrakenDepositSource {
    fn asset_converter(&self) -> &AssetConverter {
        &self.assets
    }

    async fn deposit_method(&self, venue_asset: &str) -> Result<DepositMethod> {
        const CONTEXT: &str = "DepositMethods";

        let response = self
            .api
            .query(CONTEXT, &params([("asset", venue_asset.to_string())]))
            .await?;
        let first = expect_array(&response, CONTEXT)?
            .first()
            .ok_or_else(|| ParseError::InvalidValue {
                field: "method".to_string(),
                context: CONTEXT.to_string(),
                reason: format!("no deposit method for {venue_asset}"),
            })?;
        Ok(parse_deposit_method(expect_object(first, CONTEXT)?)?)
    }

    async fn deposit_addresses(
        &self,
        venue_asset: &str,
        method: &DepositMethod,
        generate_new: bool,
    ) -> Result<Vec<DepositAddress>> {
        const CONTEXT: &str = "DepositAddresses";

        let mut query = params([
            ("asset", venue_asset.to_string()),
            ("method", method.method.clone()),
        ]);
        if generate_new {
            query.insert("new".to_string(), "true".to_string());
        }

        let response = self.api.query(CONTEXT, &query).await?;
        let mut addresses = expect_array(&response, CONTEXT)?
            .iter()
            .map(|entry| parse_deposit_address(expect_object(entry, CONTEXT)?))
            .collect::<ParseResult<Vec<_>>>()?;
        addresses.reverse();

        debug!(
            asset = venue_asset,
            listed = addresses.len(),
            generate_new,
            "Listed deposit addresses"
        );
        Ok(addresses)
    }

    fn too_many_addresses_signal(&self) -> Option<&str> {
        Some(TOO_MANY_ADDRESSES)
    }
}
