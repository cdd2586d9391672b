//! Terminal plumbing around the sequence controller.

use std::io::BufRead;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use bootseq_core::SequenceEvent;
use bootseq_display::{Canvas, SequenceRecorder};
use bootseq_engine::{InputSignal, Navigator, SequenceController};

/// Clear screen and home the cursor.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Request read from stdin that needs the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    /// Abandon the run and start over
    Restart,
}

/// Navigator that remembers where each run asked to go.
#[derive(Debug, Clone, Default)]
pub struct ShellNavigator {
    destinations: Arc<Mutex<Vec<String>>>,
}

impl ShellNavigator {
    /// Create a navigator with no recorded destinations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Destinations navigated to, oldest first.
    pub fn destinations(&self) -> Vec<String> {
        self.destinations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent destination.
    pub fn last(&self) -> Option<String> {
        self.destinations().pop()
    }
}

impl Navigator for ShellNavigator {
    fn navigate(&self, destination: &str) {
        info!("Navigating to {}", destination);
        self.destinations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(destination.to_string());
    }
}

/// Render the live container as a full-screen frame.
///
/// Returns None once the container is gone.
pub fn render_frame(controller: &SequenceController) -> Option<String> {
    let snapshot = controller.snapshot()?;
    let canvas = Canvas::render(&snapshot);
    Some(format!("{CLEAR}{}", canvas.to_plain_text()))
}

/// Forward stdin lines: `r` requests a restart, anything else counts as a
/// keypress.
///
/// Runs on a dedicated thread so a pending read never holds up runtime
/// shutdown.
pub fn spawn_input_bridge(input: InputSignal) -> mpsc::UnboundedReceiver<ShellCommand> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().eq_ignore_ascii_case("r") {
                if tx.send(ShellCommand::Restart).is_err() {
                    break;
                }
            } else {
                input.notify();
            }
        }
        debug!("Input bridge closed");
    });

    rx
}

/// Record every event into `recorder` until the controller goes away.
pub fn spawn_recorder(
    mut events: broadcast::Receiver<SequenceEvent>,
    mut recorder: SequenceRecorder,
) -> JoinHandle<SequenceRecorder> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => recorder.record(&event),
                Err(RecvError::Lagged(missed)) => {
                    warn!("Recorder lagged, {} events dropped", missed)
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!("Recorder finished with {} events", recorder.event_count());
        recorder
    })
}
