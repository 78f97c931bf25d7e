//! Deposit and withdrawal value types.

use super::number::Number;

/// A funding method as reported by the venue for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositMethod {
    /// Venue name of the method, passed back when listing addresses.
    pub method: String,
    /// Per-transaction limit; `None` means unlimited.
    pub limit: Option<Number>,
    /// Fee deducted from the deposit; `None` means unknown or free.
    pub fee: Option<Number>,
    /// Whether fresh addresses must be explicitly requested.
    pub gen_address: bool,
}

/// A deposit address listed by the venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAddress {
    pub address: String,
    /// Unix timestamp at which the address expires, 0 for never.
    pub expire_ts: i64,
    /// True when the venue reports the address as unused.
    pub is_new: bool,
}

impl DepositAddress {
    #[must_use]
    pub fn new(address: impl Into<String>, expire_ts: i64, is_new: bool) -> Self {
        Self {
            address: address.into(),
            expire_ts,
            is_new,
        }
    }
}

/// Deposit instructions handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareDepositResult {
    /// Fee deducted from the deposit, i.e. credited amount is `amount - fee`.
    pub fee: Option<Number>,
    /// Address to send funds to.
    pub address: String,
    /// Unix expiry timestamp, 0 if the address does not expire.
    pub expire_ts: i64,
}

/// Result of a withdrawal estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawInfo {
    /// Amount received after venue withdrawal fees.
    pub amount_to_receive: Number,
}

/// Result of a submitted withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawFunds {
    pub withdrawal_id: String,
}
