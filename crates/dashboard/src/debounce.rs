//! Trailing-edge debounce
//!
//! Each [`Debouncer::trigger`] restarts the quiet period; only the last value
//! of a burst is delivered, once the period elapses with no further trigger.
//! Dropping the debouncer cancels anything pending.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default quiet period
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Coalesces bursts of triggers into one delivery on `tx`
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            quiet,
            tx,
            pending: None,
        }
    }

    /// Schedule `value`, replacing anything still pending
    pub fn trigger(&mut self, value: T) {
        self.cancel();

        let quiet = self.quiet;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            trace!("debounce fired");
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// A value is waiting for the quiet period to end
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
