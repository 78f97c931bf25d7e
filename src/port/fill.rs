//! Fill notification port.

use async_trait::async_trait;

use crate::domain::Trade;
use crate::error::Error;

/// Consumer of fills, invoked by a fill tracker once registered.
#[async_trait]
pub trait FillHandler: Send + Sync {
    /// Handle one fill. An error is logged by the tracker and does not stop
    /// delivery to other handlers.
    async fn handle_fill(&self, trade: &Trade) -> Result<(), Error>;
}
