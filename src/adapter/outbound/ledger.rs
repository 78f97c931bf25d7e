//! Offer representations for ledger-settled venues.
//!
//! Strategy code describes offers as [`OfferOperation`]s with decimal
//! strings; the transaction builder consumes [`ManageOfferMutator`]s with an
//! integer amount in stroops (1e-7 units) and a rational price. The two are
//! converted here in both directions, batch order preserved.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::LedgerError;

/// Decimal places of a ledger amount.
pub const AMOUNT_SCALE: u32 = 7;

/// Decimal places used when rendering a rational price.
pub const PRICE_SCALE: u32 = 7;

/// Asset as the ledger identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerAsset {
    Native,
    Credit { code: String, issuer: String },
}

impl LedgerAsset {
    pub fn credit(code: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self::Credit {
            code: code.into(),
            issuer: issuer.into(),
        }
    }
}

impl fmt::Display for LedgerAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Credit { code, issuer } => write!(f, "{code}:{issuer}"),
        }
    }
}

/// Body shared by both offer operation kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellOffer {
    pub selling: LedgerAsset,
    pub buying: LedgerAsset,
    /// Amount of `selling`, as a decimal string.
    pub amount: String,
    /// Units of `buying` per unit of `selling`, as a decimal string.
    pub price: String,
    /// 0 creates a new offer.
    pub offer_id: u64,
}

/// Offer operation in decimal-string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOperation {
    ManageSell(SellOffer),
    PassiveSell(SellOffer),
}

impl OfferOperation {
    pub fn offer(&self) -> &SellOffer {
        match self {
            Self::ManageSell(o) | Self::PassiveSell(o) => o,
        }
    }

    pub fn is_passive(&self) -> bool {
        matches!(self, Self::PassiveSell(_))
    }
}

/// Price as a ratio of two 32-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: i32,
    pub denominator: i32,
}

impl Rational {
    /// Exact reduced ratio for `value`, if both terms fit in `i32`.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let value = value.normalize();
        let mut numerator = value.mantissa();
        let mut denominator = 10i128.checked_pow(value.scale())?;
        let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs());
        if divisor > 1 {
            let divisor = i128::try_from(divisor).ok()?;
            numerator /= divisor;
            denominator /= divisor;
        }
        Some(Self {
            numerator: i32::try_from(numerator).ok()?,
            denominator: i32::try_from(denominator).ok()?,
        })
    }

    /// `None` for a zero denominator.
    pub fn to_decimal(self) -> Option<Decimal> {
        if self.denominator == 0 {
            return None;
        }
        Decimal::from(self.numerator).checked_div(Decimal::from(self.denominator))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Offer in transaction-builder form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageOfferMutator {
    pub passive: bool,
    pub selling: LedgerAsset,
    pub buying: LedgerAsset,
    /// Amount in 1e-7 units.
    pub amount: i64,
    pub price: Rational,
    pub offer_id: u64,
}

fn invalid_op(index: usize, field: &'static str, value: &str, reason: impl Into<String>) -> LedgerError {
    LedgerError::InvalidOperation {
        index,
        field,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_amount(index: usize, raw: &str) -> Result<i64, LedgerError> {
    let value = Decimal::from_str(raw.trim()).map_err(|e| invalid_op(index, "amount", raw, e.to_string()))?;
    if value.is_sign_negative() {
        return Err(invalid_op(index, "amount", raw, "must not be negative"));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(invalid_op(
            index,
            "amount",
            raw,
            format!("more than {AMOUNT_SCALE} decimal places"),
        ));
    }
    value
        .checked_mul(Decimal::from(10i64.pow(AMOUNT_SCALE)))
        .and_then(|units| units.to_i64())
        .ok_or_else(|| invalid_op(index, "amount", raw, "out of range"))
}

fn parse_price(index: usize, raw: &str) -> Result<Rational, LedgerError> {
    let value = Decimal::from_str(raw.trim()).map_err(|e| invalid_op(index, "price", raw, e.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(invalid_op(index, "price", raw, "must be positive"));
    }
    Rational::from_decimal(value)
        .ok_or_else(|| invalid_op(index, "price", raw, "not representable as a 32-bit ratio"))
}

/// Convert operations to mutators, same order.
pub fn operations_to_mutators(ops: &[OfferOperation]) -> Result<Vec<ManageOfferMutator>, LedgerError> {
    ops.iter()
        .enumerate()
        .map(|(index, op)| -> Result<ManageOfferMutator, LedgerError> {
            let offer = op.offer();
            if op.is_passive() && offer.offer_id != 0 {
                return Err(invalid_op(
                    index,
                    "offer_id",
                    &offer.offer_id.to_string(),
                    "passive offers can only be created",
                ));
            }
            Ok(ManageOfferMutator {
                passive: op.is_passive(),
                selling: offer.selling.clone(),
                buying: offer.buying.clone(),
                amount: parse_amount(index, &offer.amount)?,
                price: parse_price(index, &offer.price)?,
                offer_id: offer.offer_id,
            })
        })
        .collect()
}

/// Convert mutators back to operations, same order.
///
/// Prices that do not terminate in decimal (e.g. `1/3`) are rounded to
/// [`PRICE_SCALE`] places.
pub fn mutators_to_operations(mutators: &[ManageOfferMutator]) -> Result<Vec<OfferOperation>, LedgerError> {
    mutators
        .iter()
        .enumerate()
        .map(|(index, m)| -> Result<OfferOperation, LedgerError> {
            if m.amount < 0 {
                return Err(LedgerError::InvalidMutator {
                    index,
                    reason: format!("negative amount {}", m.amount),
                });
            }
            let price = m.price.to_decimal().ok_or_else(|| LedgerError::InvalidMutator {
                index,
                reason: format!("price {} has a zero denominator", m.price),
            })?;

            let offer = SellOffer {
                selling: m.selling.clone(),
                buying: m.buying.clone(),
                amount: Decimal::new(m.amount, AMOUNT_SCALE).normalize().to_string(),
                price: price
                    .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
                    .normalize()
                    .to_string(),
                offer_id: m.offer_id,
            };
            Ok(if m.passive {
                OfferOperation::PassiveSell(offer)
            } else {
                OfferOperation::ManageSell(offer)
            })
        })
        .collect()
}
