//! Boot Sequence Shell
//!
//! Terminal front end for the boot animation: command line options, frame
//! rendering, stdin input forwarding and transcript recording. The binary
//! itself is in main.rs.

pub mod cli;
pub mod shell;

// Re-export commonly used types
pub use cli::Options;
pub use shell::{render_frame, spawn_input_bridge, spawn_recorder, ShellCommand, ShellNavigator};
