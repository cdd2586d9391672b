//! # bootseq
//!
//! Plays the boot animation in the terminal.
//!
//! ## Overview
//!
//! The sequence types a boot log into the main terminal, waits for a
//! keypress (or times out), bursts into a storm of themed explosion windows,
//! prints its closing messages and finally hands off to a destination.
//!
//! Press Enter to skip the interaction wait; type `r` and Enter to restart.
//!
//! ## Architecture
//!
//! This is Layer 3 - the binary that ties together:
//! - bootseq-core: Core types and configuration
//! - bootseq-display: Windows, container, canvas and recorder
//! - bootseq-engine: Phase sequencing

use std::io::Write;
use std::time::Duration;

use bootseq::cli::USAGE;
use bootseq::{render_frame, spawn_input_bridge, spawn_recorder, Options, ShellCommand, ShellNavigator};
use bootseq_core::Phase;
use bootseq_display::SequenceRecorder;
use bootseq_engine::SequenceController;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let options = Options::parse(std::env::args().skip(1))?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }
    let config = options.load_config()?;

    // Initialize logging; stdout carries the frames
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.display.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode_str = if options.headless { "headless" } else { "visual" };
    tracing::info!(
        "bootseq v{} starting in {} mode...",
        env!("CARGO_PKG_VERSION"),
        mode_str
    );

    let navigator = ShellNavigator::new();
    let controller = SequenceController::new(config.clone(), navigator.clone())?;

    let recorder = options.record.as_ref().map(|_| {
        spawn_recorder(
            controller.subscribe(),
            SequenceRecorder::with_title(config.display_dimensions(), "bootseq"),
        )
    });

    let mut commands = spawn_input_bridge(controller.input_signal());
    controller.init()?;

    let mut frames = tokio::time::interval(Duration::from_millis(config.display.frame_interval_ms.max(1)));
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            result = controller.wait_for_phase(Phase::Terminated) => {
                result?;
                break;
            }
            Some(ShellCommand::Restart) = commands.recv() => {
                let run = controller.restart()?;
                tracing::info!("Restarted as run {}", run);
            }
            _ = frames.tick(), if !options.headless => {
                if let Some(frame) = render_frame(&controller) {
                    stdout.write_all(frame.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }
    }

    // Dropping the controller closes the event stream
    drop(controller);

    if let (Some(path), Some(recorder)) = (&options.record, recorder) {
        let recorder = recorder.await?;
        recorder.save_to_file(path)?;
        tracing::info!(
            "Saved {} events to {}",
            recorder.event_count(),
            path.display()
        );
    }

    if let Some(destination) = navigator.last() {
        println!("{destination}");
    }

    tracing::info!("bootseq shutting down");

    Ok(())
}
