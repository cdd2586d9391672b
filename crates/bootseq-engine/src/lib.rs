//! # bootseq-engine
//!
//! Phase sequencing for the boot animation.
//!
//! This crate provides:
//! - Per-run cancellation tokens for every timer the sequence awaits
//! - The typing simulator and glyph storm generator
//! - Explosion window placement without duplicate anchors
//! - The interaction wait (user input or timeout)
//! - The sequence controller driving the phase chain
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on bootseq-core and
//! bootseq-display and drives the container's windows over time.
//!
//! ## Scheduling
//!
//! The engine is written for a single-threaded cooperative runtime (a
//! `current_thread` Tokio runtime). Explosion storms are separate tasks that
//! interleave on that one thread; no operation blocks it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controller;
pub mod placement;
pub mod redirect;
pub mod script;
pub mod storm;
pub mod timer;
pub mod typing;
pub mod wait;

// Re-export commonly used types
pub use controller::SequenceController;
pub use placement::{Allocation, PositionAllocator, UsedPositions};
pub use redirect::Navigator;
pub use script::ExplosionKind;
pub use storm::{GlyphStormGenerator, StormPlan};
pub use timer::{RunCanceller, RunToken};
pub use typing::{Keystroke, TypingSimulator};
pub use wait::{InputListener, InputSignal, InteractionWait, WaitResult};
