//! Per-run cancellation.
//!
//! Every delay a run awaits (typing keystrokes, storm ticks, pauses, the
//! interaction wait, the redirect settle delay) goes through the run's
//! [`RunToken`]. Cancelling the matching [`RunCanceller`], or dropping it,
//! wakes every outstanding wait at once with [`Error::Cancelled`].

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use bootseq_core::{Error, Result};

/// Owner side of a run's cancellation token.
#[derive(Debug)]
pub struct RunCanceller {
    tx: watch::Sender<bool>,
}

impl RunCanceller {
    /// Create a canceller and its first token.
    pub fn new() -> (Self, RunToken) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, RunToken { rx })
    }

    /// Invalidate every wait registered against this run.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Cancellation token shared by every timer of one run.
#[derive(Debug, Clone)]
pub struct RunToken {
    rx: watch::Receiver<bool>,
}

impl RunToken {
    /// Whether the run was cancelled (or its canceller dropped).
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// `Err(Cancelled)` once the run is cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the run is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Canceller dropped
                return;
            }
        }
    }

    /// Sleep for `duration` unless the run is cancelled first.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.run(tokio::time::sleep(duration)).await
    }

    /// Drive `future` to completion unless the run is cancelled first.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output> {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Error::Cancelled),
            output = future => Ok(output),
        }
    }
}
