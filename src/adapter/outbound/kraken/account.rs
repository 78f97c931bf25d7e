use std::collections::HashMap;

use async_trait::async_trait;

use super::{Kraken, KRAKEN_PRECISION};
use crate::application::parser::{expect_object, optional, parse_number};
use crate::domain::{Asset, Number};
use crate::error::Result;
use crate::port::{Account, QueryParams};

#[async_trait]
impl Account for Kraken {
    async fn get_account_balances(&self, assets: &[Asset]) -> Result<HashMap<Asset, Number>> {
        let symbols = assets
            .iter()
            .map(|asset| -> Result<(Asset, String)> { Ok((asset.clone(), self.assets.to_venue(asset)?)) })
            .collect::<Result<Vec<_>>>()?;

        let response = self.query("Balance", QueryParams::new()).await?;
        let balances = expect_object(&response, "Balance")?;

        let mut result = HashMap::with_capacity(symbols.len());
        for (asset, symbol) in symbols {
            // Kraken omits assets the account never held.
            let balance = match optional(parse_number(balances, &symbol, "Balance"))? {
                Some(balance) => balance,
                None => Number::zero(KRAKEN_PRECISION)?,
            };
            result.insert(asset, balance);
        }
        Ok(result)
    }
}
