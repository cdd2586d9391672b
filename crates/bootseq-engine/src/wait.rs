//! Waiting for user interaction.
//!
//! The interaction phase waits for whichever comes first: a keypress
//! forwarded through [`InputSignal::notify`] or the configured timeout.
//! Both outcomes advance the sequence; only cancellation aborts the wait.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use bootseq_core::{Error, Result};

use crate::timer::RunToken;

/// Producer side of user input notifications.
///
/// Cheap to clone; every clone notifies the same listeners.
#[derive(Debug, Clone)]
pub struct InputSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl InputSignal {
    /// Create a new signal with no input seen.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Record one user input (a keypress, a click).
    pub fn notify(&self) {
        self.tx.send_modify(|count| *count = count.wrapping_add(1));
    }

    /// Total inputs seen since creation.
    pub fn count(&self) -> u64 {
        *self.tx.borrow()
    }

    /// New listener; inputs before this call are already marked seen.
    pub fn listen(&self) -> InputListener {
        InputListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for InputSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side of user input notifications.
#[derive(Debug)]
pub struct InputListener {
    rx: watch::Receiver<u64>,
}

impl InputListener {
    /// Ignore every input received so far.
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }

    /// Whether input arrived since the last `mark_seen`.
    pub fn has_input(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Resolve on the next unseen input.
    pub async fn next_input(&mut self) {
        if self.rx.changed().await.is_err() {
            // Signal gone: no input can ever arrive
            std::future::pending::<()>().await;
        }
    }
}

/// Wait for user input, bounded by a timeout.
#[derive(Debug, Clone, Copy)]
pub struct InteractionWait {
    /// Maximum time to wait before auto-advancing
    pub timeout: Duration,
}

impl InteractionWait {
    /// Create a wait bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Wait for input or the timeout, whichever comes first.
    ///
    /// Returns `Err(Cancelled)` if the run is cancelled while waiting.
    pub async fn wait(&self, listener: &mut InputListener, token: &RunToken) -> Result<WaitResult> {
        token.check()?;
        let start = Instant::now();
        let deadline = start + self.timeout;

        let condition_met = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(Error::Cancelled),
            _ = listener.next_input() => true,
            _ = tokio::time::sleep_until(deadline) => false,
        };

        Ok(WaitResult {
            condition_met,
            waited_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }
}

/// Result of an interaction wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitResult {
    /// Whether user input arrived before the timeout
    pub condition_met: bool,

    /// Time waited in milliseconds
    pub waited_ms: u64,
}
