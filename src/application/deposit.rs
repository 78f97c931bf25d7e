//! Deposit address acquisition.
//!
//! Generating a deposit address is a mutating, rate-limited remote call, so
//! the manager first tries the addresses the venue already has and forces
//! generation at most once per call:
//!
//! ```text
//! Existing ──(no fresh address)──▶ Forced ──(no fresh address)──▶ AddressGenerationFailed
//!     │                               │
//!     └──────(fresh address)──────────┴──▶ PrepareDepositResult
//! ```
//!
//! Venues plug in through [`DepositSource`], which only knows how to read
//! methods and list addresses. The limit check, freshness filter, retry bound
//! and error translation live here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::reservation::AddressReservations;
use crate::domain::{Asset, AssetConverter, DepositAddress, DepositMethod, Number, PrepareDepositResult};
use crate::error::{DepositError, Error};
use crate::port::DepositApi;

/// The venue side of deposit acquisition.
#[async_trait]
pub trait DepositSource: Send + Sync {
    /// Converter used to resolve the venue's asset symbol.
    fn asset_converter(&self) -> &AssetConverter;

    /// Deposit method to use for `venue_asset`.
    async fn deposit_method(&self, venue_asset: &str) -> Result<DepositMethod, Error>;

    /// Addresses for `venue_asset`, oldest first. `generate_new` asks the
    /// venue to mint a fresh one.
    async fn deposit_addresses(
        &self,
        venue_asset: &str,
        method: &DepositMethod,
        generate_new: bool,
    ) -> Result<Vec<DepositAddress>, Error>;

    /// Substring of the venue error reported when the address pool is full.
    fn too_many_addresses_signal(&self) -> Option<&str> {
        None
    }
}

/// Which listing the manager is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressAttempt {
    /// Reuse an address the venue already issued.
    Existing,
    /// Ask the venue to generate one.
    Forced,
}

impl AddressAttempt {
    #[must_use]
    pub const fn generate_new(self) -> bool {
        matches!(self, Self::Forced)
    }

    /// The attempt after this one comes up empty; `None` is terminal.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Existing => Some(Self::Forced),
            Self::Forced => None,
        }
    }
}

/// [`DepositApi`] implementation over a [`DepositSource`].
pub struct DepositManager<S> {
    source: S,
    reservations: Arc<AddressReservations>,
}

impl<S: DepositSource> DepositManager<S> {
    /// Manager without address reservations.
    pub fn new(source: S) -> Self {
        Self::with_reservations(source, Arc::new(AddressReservations::disabled()))
    }

    /// Manager sharing `reservations` with other managers of the same venue.
    pub fn with_reservations(source: S, reservations: Arc<AddressReservations>) -> Self {
        Self {
            source,
            reservations,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn reservations(&self) -> &Arc<AddressReservations> {
        &self.reservations
    }

    async fn list_addresses(
        &self,
        asset: &Asset,
        venue_asset: &str,
        method: &DepositMethod,
        attempt: AddressAttempt,
    ) -> Result<Vec<DepositAddress>, Error> {
        match self
            .source
            .deposit_addresses(venue_asset, method, attempt.generate_new())
            .await
        {
            Ok(addresses) => Ok(addresses),
            Err(e) => {
                let exhausted = self
                    .source
                    .too_many_addresses_signal()
                    .is_some_and(|signal| e.to_string().contains(signal));
                if exhausted {
                    warn!(asset = %asset, error = %e, "Deposit address pool exhausted");
                    Err(DepositError::TooManyAddresses.into())
                } else {
                    Err(e)
                }
            }
        }
    }
}

#[async_trait]
impl<S: DepositSource> DepositApi for DepositManager<S> {
    async fn prepare_deposit(&self, asset: &Asset, amount: &Number) -> Result<PrepareDepositResult, Error> {
        let venue_asset = self.source.asset_converter().to_venue(asset)?;

        let method = self.source.deposit_method(&venue_asset).await?;
        if let Some(limit) = method.limit {
            if *amount > limit {
                return Err(DepositError::AmountAboveLimit {
                    amount: *amount,
                    limit,
                }
                .into());
            }
        }

        let mut attempt = AddressAttempt::Existing;
        loop {
            let addresses = self
                .list_addresses(asset, &venue_asset, &method, attempt)
                .await?;
            let fresh: Vec<&DepositAddress> = addresses.iter().filter(|a| a.is_new).collect();

            if let Some(address) = self
                .reservations
                .claim_first(fresh.iter().map(|a| a.address.as_str()))
            {
                let expire_ts = fresh
                    .iter()
                    .find(|a| a.address == address)
                    .map_or(0, |a| a.expire_ts);
                info!(
                    asset = %asset,
                    method = %method.method,
                    generated = attempt.generate_new(),
                    "Prepared deposit address"
                );
                return Ok(PrepareDepositResult {
                    fee: method.fee,
                    address,
                    expire_ts,
                });
            }

            match attempt.next() {
                Some(next) => {
                    debug!(
                        asset = %asset,
                        listed = addresses.len(),
                        "No fresh deposit address, forcing generation"
                    );
                    attempt = next;
                }
                None => {
                    return Err(DepositError::AddressGenerationFailed {
                        asset: asset.to_string(),
                    }
                    .into())
                }
            }
        }
    }
}
