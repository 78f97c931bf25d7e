//! Short-lived claims on deposit addresses.
//!
//! Two concurrent deposit preparations can see the same fresh address in a
//! venue listing. A claim marks the address as handed out for a while so
//! the second caller moves on to the next one.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

/// Table of addresses recently handed out.
///
/// A zero TTL disables the table: nothing is ever reserved.
#[derive(Debug)]
pub struct AddressReservations {
    ttl: Duration,
    claims: Mutex<HashMap<String, Instant>>,
}

impl AddressReservations {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            claims: Mutex::new(HashMap::new()),
        }
    }

    /// Table that never reserves anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Claim the first candidate nobody else holds, in candidate order.
    ///
    /// Expired claims are dropped first. Purge, pick and insert happen under
    /// one lock, so two callers never get the same address.
    pub fn claim_first<'a, I>(&self, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.is_enabled() {
            return candidates.into_iter().next().map(str::to_string);
        }

        let now = Instant::now();
        let mut claims = self.claims.lock();
        claims.retain(|_, claimed_at| now.duration_since(*claimed_at) < self.ttl);

        let address = candidates
            .into_iter()
            .find(|candidate| !claims.contains_key(*candidate))?
            .to_string();
        claims.insert(address.clone(), now);
        trace!(address = %address, active = claims.len(), "Reserved deposit address");
        Some(address)
    }

    /// Whether `address` is currently held.
    #[must_use]
    pub fn is_reserved(&self, address: &str) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.claims
            .lock()
            .get(address)
            .is_some_and(|claimed_at| claimed_at.elapsed() < self.ttl)
    }

    /// Give an address back before its claim expires.
    pub fn release(&self, address: &str) -> bool {
        self.claims.lock().remove(address).is_some()
    }

    /// Number of claims, expired ones included until the next purge.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
