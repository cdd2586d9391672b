//! Phase and identifier types for sequence runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ordered stage of the boot animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing is running (cold start, or mid-restart)
    Idle,
    /// Boot log is being typed into the main terminal
    Booting,
    /// Waiting for a keypress or the interaction timeout
    AwaitingInteraction,
    /// Explosion windows are spawned and storming
    Exploding,
    /// Closing messages are being appended
    Finalizing,
    /// Settling before navigation
    Redirecting,
    /// Run finished and navigation was signalled
    Terminated,
}

impl Phase {
    /// Phases of one complete run, in order.
    pub const CHAIN: [Phase; 6] = [
        Phase::Booting,
        Phase::AwaitingInteraction,
        Phase::Exploding,
        Phase::Finalizing,
        Phase::Redirecting,
        Phase::Terminated,
    ];

    /// The phase that follows this one in a run, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::Booting),
            Phase::Booting => Some(Phase::AwaitingInteraction),
            Phase::AwaitingInteraction => Some(Phase::Exploding),
            Phase::Exploding => Some(Phase::Finalizing),
            Phase::Finalizing => Some(Phase::Redirecting),
            Phase::Redirecting => Some(Phase::Terminated),
            Phase::Terminated => None,
        }
    }

    /// True for every phase except `Idle` and `Terminated`.
    pub fn is_animating(self) -> bool {
        !matches!(self, Phase::Idle | Phase::Terminated)
    }

    /// Whether `init()` may start a run from this phase.
    pub fn can_init(self) -> bool {
        matches!(self, Phase::Idle | Phase::Terminated)
    }

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Booting => "booting",
            Phase::AwaitingInteraction => "awaiting_interaction",
            Phase::Exploding => "exploding",
            Phase::Finalizing => "finalizing",
            Phase::Redirecting => "redirecting",
            Phase::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for one run of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for RunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a terminal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(Uuid);

impl WindowId {
    /// Create a new random window ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a window is the boot terminal or an explosion window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRole {
    /// The single boot-sequence window, alive for the whole run
    Main,
    /// Ephemeral window owned by the `Exploding` phase
    Explosion,
}
