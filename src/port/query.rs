//! Remote-query boundary.
//!
//! A venue transport only has to issue a named operation with string
//! parameters and hand back the untyped payload. Signing, rate limiting,
//! retries and timeouts live behind this trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;

/// Parameters for one remote operation, ordered for stable signing and logs.
pub type QueryParams = BTreeMap<String, String>;

/// Generic query function exposed by a venue transport.
#[async_trait]
pub trait RemoteQuery: Send + Sync {
    /// Issue `method` with `params`.
    ///
    /// Returns the payload with any venue envelope removed. Venue-reported
    /// failures come back as [`Error::Venue`] carrying the venue's message
    /// unchanged, so callers can recognise specific signals in it.
    async fn query(&self, method: &str, params: &QueryParams) -> Result<Value, Error>;
}
