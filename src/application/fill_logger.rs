//! Fill handler that writes every fill to the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::Trade;
use crate::error::Error;
use crate::port::FillHandler;

/// Logs each fill at `info`.
#[derive(Debug, Clone, Default)]
pub struct FillLogger {
    label: Option<String>,
}

impl FillLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every line with `label`, e.g. the strategy name.
    #[must_use]
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

#[async_trait]
impl FillHandler for FillLogger {
    async fn handle_fill(&self, trade: &Trade) -> Result<(), Error> {
        info!(
            label = self.label.as_deref().unwrap_or(""),
            pair = %trade.pair(),
            action = %trade.action(),
            price = %trade.price(),
            volume = %trade.volume(),
            txid = %trade.transaction_id(),
            fee = ?trade.fee().map(ToString::to_string),
            "Received fill"
        );
        Ok(())
    }
}
