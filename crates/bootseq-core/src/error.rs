//! Error types for the boot sequence engine.

use thiserror::Error;

use crate::{Phase, WindowId};

/// Main error type for sequencer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The run's cancellation token fired
    #[error("Sequence run cancelled")]
    Cancelled,

    /// The animation container was torn down
    #[error("Animation container destroyed")]
    ContainerDestroyed,

    /// Window is no longer mounted in the container
    #[error("Window not mounted: {0}")]
    WindowNotMounted(WindowId),

    /// `init()` called while a run is active
    #[error("Sequence already running (phase: {0})")]
    AlreadyRunning(Phase),

    /// `restart()` called before the sequence was ever started
    #[error("Sequence not started")]
    NotStarted,

    /// Out-of-order phase transition
    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        /// Current phase
        from: Phase,
        /// Requested phase
        to: Phase,
    },

    /// Invalid display or window dimensions
    #[error("Invalid dimensions: {rows}x{cols}")]
    InvalidDimensions {
        /// Number of rows
        rows: u16,
        /// Number of columns
        cols: u16,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means "the run was torn down", which stops the
    /// phase chain silently instead of being reported.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            Error::Cancelled | Error::ContainerDestroyed | Error::WindowNotMounted(_)
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error() {
        let err = Error::Cancelled;
        assert_eq!(err.to_string(), "Sequence run cancelled");
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_window_not_mounted_error() {
        let err = Error::WindowNotMounted(WindowId::new());
        assert!(err.to_string().starts_with("Window not mounted:"));
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_container_destroyed_error() {
        let err = Error::ContainerDestroyed;
        assert_eq!(err.to_string(), "Animation container destroyed");
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_already_running_error() {
        let err = Error::AlreadyRunning(Phase::Exploding);
        assert_eq!(err.to_string(), "Sequence already running (phase: exploding)");
        assert!(!err.is_cancellation());
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = Error::InvalidTransition {
            from: Phase::Booting,
            to: Phase::Finalizing,
        };
        assert_eq!(
            err.to_string(),
            "Invalid phase transition: booting -> finalizing"
        );
    }

    #[test]
    fn test_invalid_dimensions_error() {
        let err = Error::InvalidDimensions { rows: 0, cols: 100 };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x100");
    }

    #[test]
    fn test_config_error() {
        let err = Error::Config("explosion.window_count must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: explosion.window_count must be > 0"
        );
        assert!(!err.is_cancellation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
