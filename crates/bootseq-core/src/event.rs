//! Events broadcast while a sequence runs.

use serde::{Deserialize, Serialize};

use crate::{Line, Phase, Placement, RunId, WindowId, WindowRole};

/// Observable event emitted by the sequencer and its container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SequenceEvent {
    /// The controller moved to a new phase
    PhaseChanged {
        /// Run the transition belongs to (`None` when resetting to idle)
        run: Option<RunId>,
        /// Previous phase
        from: Phase,
        /// New phase
        to: Phase,
    },
    /// A window was mounted into the container
    WindowMounted {
        /// Window identifier
        window: WindowId,
        /// Window title
        title: String,
        /// Main or explosion window
        role: WindowRole,
        /// Where it was placed
        placement: Placement,
    },
    /// A window was removed from the container
    WindowUnmounted {
        /// Window identifier
        window: WindowId,
    },
    /// A line was committed to a window
    LineAppended {
        /// Window identifier
        window: WindowId,
        /// The appended line
        line: Line,
    },
    /// The interaction wait resolved
    InteractionResolved {
        /// True if user input ended the wait, false on timeout
        observed: bool,
        /// Time spent waiting in milliseconds
        waited_ms: u64,
    },
    /// Navigation was signalled
    Redirected {
        /// Run that completed
        run: RunId,
        /// Navigation destination
        destination: String,
    },
}

impl SequenceEvent {
    /// The phase entered, for `PhaseChanged` events.
    pub fn entered_phase(&self) -> Option<Phase> {
        match self {
            SequenceEvent::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        }
    }
}
