//! Cooperative cancellation for automation batches.
//!
//! Each batch gets a fresh [`CancellationToken`] from the runner's
//! [`CancellationChannel`], so a stop requested for one batch can never leak
//! into the next. The token is only ever observed at suspension points; an
//! action already dispatched to the page is not undone.

use crate::error::{DriverError, Stage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Answer to a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAck {
    /// The in-flight batch will halt at its next suspension point
    Acknowledged,
    /// A stop was already requested for this batch
    AlreadyRequested,
    /// No batch is in flight
    NotRunning,
}

/// Holder of the current batch's cancellation token
#[derive(Debug, Default)]
pub struct CancellationChannel {
    current: Mutex<Option<CancellationToken>>,
}

impl CancellationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Install a fresh, unset flag for a new batch. Returns `None` while
    /// another batch still holds the channel.
    pub(crate) fn arm(&self) -> Option<CancellationToken> {
        let mut slot = self.slot();
        if slot.is_some() {
            return None;
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        Some(token)
    }

    pub(crate) fn disarm(&self) {
        self.slot().take();
    }

    pub fn is_armed(&self) -> bool {
        self.slot().is_some()
    }

    /// Set the flag for the batch in flight
    pub fn request_stop(&self) -> StopAck {
        match self.slot().as_ref() {
            None => StopAck::NotRunning,
            Some(token) if token.is_cancelled() => StopAck::AlreadyRequested,
            Some(token) => {
                token.cancel();
                tracing::info!("Stop requested for the running batch");
                StopAck::Acknowledged
            }
        }
    }

    pub fn is_stop_requested(&self) -> bool {
        self.slot().as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Cloneable controller-side handle for stopping whatever batch is running
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<CancellationChannel>);

impl StopHandle {
    pub(crate) fn new(channel: Arc<CancellationChannel>) -> Self {
        Self(channel)
    }

    pub fn request_stop(&self) -> StopAck {
        self.0.request_stop()
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.is_stop_requested()
    }
}

/// Per-batch state passed by reference into every driver component
#[derive(Debug)]
pub struct BatchContext {
    token: CancellationToken,
    total: usize,
    processed: AtomicUsize,
}

impl BatchContext {
    /// A context with its own, unset flag
    pub fn new(total: usize) -> Self {
        Self::with_token(CancellationToken::new(), total)
    }

    pub fn with_token(token: CancellationToken, total: usize) -> Self {
        Self {
            token,
            total,
            processed: AtomicUsize::new(0),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_stop_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail with `Cancelled` if a stop has been requested
    pub fn ensure_running(&self, stage: Stage) -> Result<(), DriverError> {
        if self.is_stop_requested() {
            return Err(DriverError::Cancelled { stage });
        }
        Ok(())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Count one confirmed insertion and return the new count
    pub(crate) fn record_success(&self) -> usize {
        match self
            .processed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.total).then_some(n + 1)
            }) {
            Ok(previous) => previous + 1,
            Err(current) => current,
        }
    }
}
