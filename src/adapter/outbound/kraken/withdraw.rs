use async_trait::async_trait;
use tracing::info;

use super::{params, Kraken};
use crate::application::parser::{expect_object, parse_number, parse_string};
use crate::domain::{Asset, Number, WithdrawFunds, WithdrawInfo};
use crate::error::{Result, WithdrawError};
use crate::port::{QueryParams, WithdrawApi};

impl Kraken {
    /// Kraken addresses withdrawals by the name of a key saved on the account.
    fn withdraw_params(&self, asset: &Asset, amount: &Number, address: &str) -> Result<QueryParams> {
        Ok(params([
            ("asset", self.assets.to_venue(asset)?),
            ("key", address.to_string()),
            ("amount", amount.as_string()),
        ]))
    }
}

#[async_trait]
impl WithdrawApi for Kraken {
    async fn get_withdraw_info(&self, asset: &Asset, amount: &Number, address: &str) -> Result<WithdrawInfo> {
        const CONTEXT: &str = "WithdrawInfo";

        let response = self
            .query(CONTEXT, self.withdraw_params(asset, amount, address)?)
            .await?;
        let info = expect_object(&response, CONTEXT)?;

        let limit = parse_number(info, "limit", CONTEXT)?;
        if *amount > limit {
            return Err(WithdrawError::AmountAboveLimit {
                amount: *amount,
                limit,
            }
            .into());
        }

        let fee = parse_number(info, "fee", CONTEXT)?;
        if fee.as_decimal() >= amount.as_decimal() {
            return Err(WithdrawError::AmountInvalid {
                amount: *amount,
                fee,
            }
            .into());
        }

        Ok(WithdrawInfo {
            amount_to_receive: parse_number(info, "amount", CONTEXT)?,
        })
    }

    async fn withdraw_funds(&self, asset: &Asset, amount: &Number, address: &str) -> Result<WithdrawFunds> {
        const CONTEXT: &str = "Withdraw";

        let response = self
            .query(CONTEXT, self.withdraw_params(asset, amount, address)?)
            .await?;
        let body = expect_object(&response, CONTEXT)?;
        let withdrawal_id = parse_string(body, "refid", CONTEXT)?;

        info!(asset = %asset, amount = %amount, refid = %withdrawal_id, "Withdrawal submitted");
        Ok(WithdrawFunds { withdrawal_id })
    }
}
