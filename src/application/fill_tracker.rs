//! Cursor-driven fill tracking for one trading pair.
//!
//! A [`FillTracker`] polls the venue's trade history from its cursor,
//! advances the cursor, and hands every new trade to each registered
//! [`FillHandler`] in registration order. Delivery is at least once per
//! handler; the cursor lives in memory only.
//!
//! The loop can run in the caller's task ([`FillTracker::track_fills`]), in a
//! background task ([`FillTracker::spawn`]), or be driven one step at a time
//! ([`FillTracker::fill_track_single_iteration`]).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::{Cursor, Trade, TradingPair};
use crate::error::{Error, FillTrackerError};
use crate::port::{FillHandler, FillTrackable, TradeFetcher};

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Lifecycle of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Built, handlers may still be registered.
    Idle,
    /// The polling loop is active.
    Running,
    /// The loop exited on a stop signal.
    Stopped,
    /// The loop exited on a fetch error.
    Failed,
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Polls one pair's fills and fans them out to handlers.
pub struct FillTracker {
    pair: TradingPair,
    fetcher: Arc<dyn FillTrackable>,
    handlers: Vec<Arc<dyn FillHandler>>,
    poll_interval: Duration,
    cursor: Option<Cursor>,
    state: watch::Sender<TrackerState>,
}

impl FillTracker {
    pub fn new(pair: TradingPair, fetcher: Arc<dyn FillTrackable>, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(TrackerState::Idle);
        Self {
            pair,
            fetcher,
            handlers: Vec::new(),
            poll_interval,
            cursor: None,
            state,
        }
    }

    /// Resume from a known cursor instead of anchoring at "now".
    #[must_use]
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn pair(&self) -> &TradingPair {
        &self.pair
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Position of the last fetched trade; `None` before the first fetch.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn state(&self) -> TrackerState {
        *self.state.borrow()
    }

    pub fn is_running_in_background(&self) -> bool {
        self.state() == TrackerState::Running
    }

    /// Add a handler. Only allowed before the loop has started.
    pub fn register_handler(&mut self, handler: Arc<dyn FillHandler>) -> Result<(), FillTrackerError> {
        if self.state() != TrackerState::Idle {
            return Err(FillTrackerError::AlreadyStarted {
                pair: self.pair.to_string(),
            });
        }
        self.handlers.push(handler);
        Ok(())
    }

    pub fn num_handlers(&self) -> usize {
        self.handlers.len()
    }

    /// Fetch trades since the cursor, advance it, and dispatch them.
    ///
    /// Without a cursor the tracker first anchors at the venue's latest
    /// cursor, so old fills are not replayed. Handler failures are logged
    /// and do not stop dispatch; fetch failures are returned.
    pub async fn fill_track_single_iteration(&mut self) -> Result<Vec<Trade>, Error> {
        let start = match self.cursor.take() {
            Some(cursor) => cursor,
            None => {
                let latest = self.fetcher.get_latest_trade_cursor().await?;
                debug!(pair = %self.pair, cursor = %latest, "Anchored fill cursor");
                latest
            }
        };

        let result = match self
            .fetcher
            .get_trade_history(&self.pair, Some(&start), None)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                self.cursor = Some(start);
                return Err(e);
            }
        };
        self.cursor = Some(result.cursor);

        if !result.trades.is_empty() {
            debug!(
                pair = %self.pair,
                count = result.trades.len(),
                cursor = ?self.cursor.as_ref().map(Cursor::as_str),
                "Fetched new fills"
            );
        }

        for trade in &result.trades {
            for (index, handler) in self.handlers.iter().enumerate() {
                if let Err(e) = handler.handle_fill(trade).await {
                    warn!(
                        pair = %self.pair,
                        handler = index,
                        txid = %trade.transaction_id(),
                        error = %e,
                        "Fill handler failed"
                    );
                }
            }
        }

        Ok(result.trades)
    }

    /// Run the polling loop until `shutdown` flips to `true` (or its sender
    /// is dropped) or a fetch fails.
    ///
    /// The stop signal is observed between iterations, never in the middle
    /// of a dispatch.
    pub async fn track_fills(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), Error> {
        if self.state() != TrackerState::Idle {
            return Err(FillTrackerError::AlreadyStarted {
                pair: self.pair.to_string(),
            }
            .into());
        }
        self.state.send_replace(TrackerState::Running);
        info!(
            pair = %self.pair,
            handlers = self.handlers.len(),
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Fill tracker started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.fill_track_single_iteration().await {
                error!(pair = %self.pair, error = %e, "Fill tracker failed");
                self.state.send_replace(TrackerState::Failed);
                return Err(e);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.state.send_replace(TrackerState::Stopped);
        info!(pair = %self.pair, "Fill tracker stopped");
        Ok(())
    }

    /// Run [`track_fills`](Self::track_fills) on a background task.
    ///
    /// The tracker moves into the task, so no handler can be registered
    /// afterwards. Dropping the returned handle stops the tracker.
    pub fn spawn(mut self) -> FillTrackerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = self.state.subscribe();
        let pair = self.pair.clone();
        let join = tokio::spawn(async move { self.track_fills(shutdown_rx).await });

        FillTrackerHandle {
            pair,
            shutdown_tx,
            state,
            join,
        }
    }
}

impl fmt::Debug for FillTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillTracker")
            .field("pair", &self.pair)
            .field("handlers", &self.handlers.len())
            .field("poll_interval", &self.poll_interval)
            .field("cursor", &self.cursor)
            .field("state", &self.state())
            .finish()
    }
}

/// Control over a tracker running in the background.
#[derive(Debug)]
pub struct FillTrackerHandle {
    pair: TradingPair,
    shutdown_tx: watch::Sender<bool>,
    state: watch::Receiver<TrackerState>,
    join: JoinHandle<Result<(), Error>>,
}

impl FillTrackerHandle {
    pub fn pair(&self) -> &TradingPair {
        &self.pair
    }

    pub fn state(&self) -> TrackerState {
        *self.state.borrow()
    }

    pub fn is_running_in_background(&self) -> bool {
        self.state() == TrackerState::Running && !self.join.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Ask the loop to exit after the current iteration.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Wait for the loop to exit and return its outcome.
    pub async fn join(self) -> Result<(), Error> {
        match self.join.await {
            Ok(result) => result,
            Err(e) => Err(FillTrackerError::TaskAborted {
                pair: self.pair.to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    /// [`stop`](Self::stop) then [`join`](Self::join).
    pub async fn shutdown(self) -> Result<(), Error> {
        self.stop();
        self.join().await
    }
}
