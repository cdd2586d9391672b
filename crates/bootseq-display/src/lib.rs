//! # bootseq-display
//!
//! Visual model for the boot sequence.
//!
//! This crate provides:
//! - Terminal windows with append-only line buffers
//! - The animation container that owns every mounted window
//! - Weak container/window references used by phase tasks
//! - A text canvas that composites windows into a frame
//! - Transcript recording of sequence events
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on bootseq-core and is
//! driven by bootseq-engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canvas;
pub mod container;
pub mod recording;
pub mod window;

// Re-export commonly used types
pub use canvas::Canvas;
pub use container::{AnimationContainer, ContainerRef, ContainerSnapshot, WindowRef};
pub use recording::{RecordEvent, SequenceRecorder, TranscriptHeader};
pub use window::{TerminalWindow, WindowView};
