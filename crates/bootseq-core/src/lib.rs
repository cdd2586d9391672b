//! # bootseq-core
//!
//! Core types for the boot sequence engine.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other bootseq crates. It provides:
//!
//! - Geometry types (Position, Dimensions, Bounds, Placement)
//! - Phase and run identifier types
//! - Terminal line kinds and prompt formatting
//! - Sequence events shared by observers
//! - Configuration loaded from YAML
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other bootseq crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod line;
pub mod phase;

// Re-export commonly used types
pub use config::{
    BootStep, ContentSettings, DisplaySettings, ExplosionSettings, RedirectSettings, MAX_DELAY_MS,
    SequenceConfig, StormSettings, TimingSettings, TypingSpeed,
};
pub use error::{Error, Result};
pub use event::SequenceEvent;
pub use geometry::{Bounds, Dimensions, Placement, Position};
pub use line::{Line, LineKind, PromptStyle};
pub use phase::{Phase, RunId, WindowId, WindowRole};
