//! The sequence controller.
//!
//! Owns the run state (phase, container, used anchors, cancellation handle)
//! and drives the phase chain as a single spawned task per run. Every state
//! mutation made by the chain checks the run generation under the lock, so
//! a task belonging to a superseded run can never touch the new run.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use bootseq_core::{
    Error, LineKind, Phase, Placement, Position, PromptStyle, Result, RunId, SequenceConfig,
    SequenceEvent, WindowId,
};
use bootseq_display::{AnimationContainer, ContainerRef, ContainerSnapshot, TerminalWindow, WindowRef};

use crate::placement::{PositionAllocator, UsedPositions};
use crate::redirect::Navigator;
use crate::script::{
    self, ExplosionKind, FINAL_MESSAGES, FINAL_TAG, INTERACTIVE_PROMPT, MAIN_TAG, PROTOCOL_LINE,
};
use crate::storm::{GlyphStormGenerator, MatrixStorm, StormPlan};
use crate::timer::{RunCanceller, RunToken};
use crate::typing::{jittered, type_into, TypingSimulator};
use crate::wait::{InputSignal, InteractionWait, WaitResult};

/// Buffered events per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 1024;

struct ControllerState {
    phase: Phase,
    /// Bumped by every init/restart
    generation: u64,
    run_id: Option<RunId>,
    container: Option<AnimationContainer>,
    main_window: Option<WindowId>,
    used_positions: UsedPositions,
    canceller: Option<RunCanceller>,
    chain: Option<JoinHandle<()>>,
    /// Phases entered by the current run
    history: Vec<Phase>,
    rng: StdRng,
}

struct Shared {
    state: Mutex<ControllerState>,
    config: SequenceConfig,
    navigator: Box<dyn Navigator>,
    input: InputSignal,
    events: broadcast::Sender<SequenceEvent>,
    phase_tx: watch::Sender<Phase>,
    style: PromptStyle,
    allocator: PositionAllocator,
    generator: Arc<GlyphStormGenerator>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SequenceEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn set_phase(&self, state: &mut ControllerState, to: Phase) {
        let from = std::mem::replace(&mut state.phase, to);
        if to != Phase::Idle {
            state.history.push(to);
        }
        info!(
            "Phase transition: {} -> {} (generation {})",
            from, to, state.generation
        );
        self.phase_tx.send_replace(to);
        self.emit(SequenceEvent::PhaseChanged {
            run: state.run_id,
            from,
            to,
        });
    }

    /// Cancel every timer of the current run and release its container.
    fn teardown(&self, state: &mut ControllerState) {
        if let Some(canceller) = state.canceller.take() {
            canceller.cancel();
        }
        if let Some(chain) = state.chain.take() {
            chain.abort();
        }
        if let Some(container) = state.container.take() {
            let released = container.destroy();
            debug!("Released {} windows of generation {}", released, state.generation);
        }
        state.main_window = None;
        state.used_positions.clear();
    }

    fn start_run(self: &Arc<Self>, state: &mut ControllerState, runtime: &Handle) -> Result<RunId> {
        state.generation += 1;
        let run_id = RunId::new();
        state.run_id = Some(run_id);
        state.history.clear();
        state.used_positions.clear();

        let dimensions = self.config.display_dimensions();
        let container = AnimationContainer::with_events(dimensions, self.events.clone());
        let (canceller, token) = RunCanceller::new();

        self.set_phase(state, Phase::Booting);

        let content = &self.config.content;
        let main = container.mount(TerminalWindow::main(
            script::main_title(&content.hostname, &content.version),
            Placement::main(Position::origin()),
            dimensions,
        ))?;

        let container_ref = container.downgrade();
        let run = RunContext {
            shared: Arc::clone(self),
            generation: state.generation,
            run_id,
            token,
            main: container_ref.window(main),
            container: container_ref,
        };

        state.container = Some(container);
        state.main_window = Some(main);
        state.canceller = Some(canceller);
        state.chain = Some(runtime.spawn(run.execute()));

        info!("Run {} started (generation {})", run_id, state.generation);
        Ok(run_id)
    }
}

fn current_runtime() -> Result<Handle> {
    Handle::try_current().map_err(|e| Error::Other(format!("no Tokio runtime: {e}")))
}

/// Drives the boot animation through its phases.
///
/// # Example
///
/// ```
/// use bootseq_core::{Phase, SequenceConfig};
/// use bootseq_engine::SequenceController;
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() -> bootseq_core::Result<()> {
/// let controller = SequenceController::new(SequenceConfig::default(), |to: &str| {
///     println!("navigating to {to}");
/// })?;
///
/// controller.init()?;
/// assert!(controller.is_running());
///
/// controller.wait_for_phase(Phase::Terminated).await?;
/// assert!(!controller.is_running());
/// # Ok(())
/// # }
/// ```
pub struct SequenceController {
    shared: Arc<Shared>,
}

impl SequenceController {
    /// Create an idle controller.
    pub fn new<N>(config: SequenceConfig, navigator: N) -> Result<Self>
    where
        N: Navigator + 'static,
    {
        config.validate()?;

        let generator = Arc::new(GlyphStormGenerator::new(&config.storm.alphabet)?);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (phase_tx, _) = watch::channel(Phase::Idle);

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState {
                    phase: Phase::Idle,
                    generation: 0,
                    run_id: None,
                    container: None,
                    main_window: None,
                    used_positions: UsedPositions::new(),
                    canceller: None,
                    chain: None,
                    history: Vec::new(),
                    rng,
                }),
                style: PromptStyle::new(config.content.hostname.clone()),
                allocator: PositionAllocator::from_config(&config),
                navigator: Box::new(navigator),
                input: InputSignal::new(),
                events,
                phase_tx,
                generator,
                config,
            }),
        })
    }

    /// Start a run.
    ///
    /// Valid from `Idle` or `Terminated`; returns immediately with the run
    /// going on in a spawned task. Must be called within a Tokio runtime.
    pub fn init(&self) -> Result<RunId> {
        let runtime = current_runtime()?;
        let mut state = self.shared.lock();
        if !state.phase.can_init() {
            return Err(Error::AlreadyRunning(state.phase));
        }
        self.shared.start_run(&mut state, &runtime)
    }

    /// Abandon the current run and start a fresh one.
    ///
    /// Valid in every phase except `Idle`. The old run's timers, storms and
    /// container are torn down before the new run starts, all under one
    /// lock: however many restarts race, exactly one run stays live.
    pub fn restart(&self) -> Result<RunId> {
        let runtime = current_runtime()?;
        let mut state = self.shared.lock();
        if state.phase == Phase::Idle {
            return Err(Error::NotStarted);
        }

        info!("Restarting sequence from {}", state.phase);
        self.shared.teardown(&mut state);
        self.shared.set_phase(&mut state, Phase::Idle);
        self.shared.start_run(&mut state, &runtime)
    }

    /// Whether a run is animating (`Booting` through `Redirecting`).
    pub fn is_running(&self) -> bool {
        self.phase().is_animating()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.shared.lock().phase
    }

    /// Identifier of the current (or last) run.
    pub fn run_id(&self) -> Option<RunId> {
        self.shared.lock().run_id
    }

    /// Number of runs started so far.
    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    /// Phases entered by the current run, in order.
    pub fn phase_history(&self) -> Vec<Phase> {
        self.shared.lock().history.clone()
    }

    /// Anchors used by the current explosion, sorted.
    pub fn used_positions(&self) -> Vec<Position> {
        self.shared.lock().used_positions.to_vec()
    }

    /// Weak reference to the live container (dead if none).
    pub fn container(&self) -> ContainerRef {
        self.shared
            .lock()
            .container
            .as_ref()
            .map(AnimationContainer::downgrade)
            .unwrap_or_default()
    }

    /// Point-in-time view of the live container.
    pub fn snapshot(&self) -> Option<ContainerSnapshot> {
        self.shared
            .lock()
            .container
            .as_ref()
            .map(AnimationContainer::snapshot)
    }

    /// Main window of the live run.
    pub fn main_window(&self) -> Option<WindowId> {
        self.shared.lock().main_window
    }

    /// Configuration in use.
    pub fn config(&self) -> &SequenceConfig {
        &self.shared.config
    }

    /// Subscribe to sequence events.
    pub fn subscribe(&self) -> broadcast::Receiver<SequenceEvent> {
        self.shared.events.subscribe()
    }

    /// Resolve once the current run has entered `phase`.
    pub async fn wait_for_phase(&self, phase: Phase) -> Result<()> {
        let mut rx = self.shared.phase_tx.subscribe();
        loop {
            {
                let state = self.shared.lock();
                if state.phase == phase || state.history.contains(&phase) {
                    return Ok(());
                }
            }
            rx.changed().await.map_err(|_| Error::Cancelled)?;
        }
    }

    /// Forward one user input (keypress) to the sequence.
    pub fn notify_input(&self) {
        self.shared.input.notify();
    }

    /// Handle for forwarding input from another task.
    pub fn input_signal(&self) -> InputSignal {
        self.shared.input.clone()
    }
}

impl Drop for SequenceController {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        self.shared.teardown(&mut state);
    }
}

impl std::fmt::Debug for SequenceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("SequenceController")
            .field("phase", &state.phase)
            .field("generation", &state.generation)
            .field("run_id", &state.run_id)
            .finish()
    }
}

/// Everything one run's phase chain needs.
struct RunContext {
    shared: Arc<Shared>,
    generation: u64,
    run_id: RunId,
    token: RunToken,
    container: ContainerRef,
    main: WindowRef,
}

impl RunContext {
    async fn execute(self) {
        match self.run_chain().await {
            Ok(()) => info!("Run {} completed", self.run_id),
            Err(e) if e.is_cancellation() => debug!("Run {} stopped: {}", self.run_id, e),
            Err(e) => warn!("Run {} failed: {}", self.run_id, e),
        }
    }

    async fn run_chain(&self) -> Result<()> {
        self.execute_os_loading_sequence().await?;

        self.enter(Phase::AwaitingInteraction)?;
        self.prompt_user_interaction().await?;

        self.enter(Phase::Exploding)?;
        self.create_matrix_terminal_explosion().await?;

        self.enter(Phase::Finalizing)?;
        self.add_matrix_final_messages()?;

        self.enter(Phase::Redirecting)?;
        self.redirect_to_home().await
    }

    /// Lock the controller state, failing if this run was superseded.
    fn current(&self) -> Result<MutexGuard<'_, ControllerState>> {
        self.token.check()?;
        let state = self.shared.lock();
        if state.generation != self.generation {
            debug!(
                "Stale run {} (generation {}, current {})",
                self.run_id, self.generation, state.generation
            );
            return Err(Error::Cancelled);
        }
        Ok(state)
    }

    fn advance(&self, state: &mut ControllerState, to: Phase) -> Result<()> {
        if state.phase.next() != Some(to) {
            return Err(Error::InvalidTransition {
                from: state.phase,
                to,
            });
        }
        self.shared.set_phase(state, to);
        Ok(())
    }

    fn enter(&self, to: Phase) -> Result<()> {
        let mut state = self.current()?;
        self.advance(&mut state, to)
    }

    /// Independent RNG for one line or storm, drawn from the run RNG.
    fn fork_rng(&self) -> Result<StdRng> {
        let mut state = self.current()?;
        Ok(StdRng::seed_from_u64(state.rng.gen()))
    }

    async fn execute_os_loading_sequence(&self) -> Result<()> {
        let config = &self.shared.config;
        for step in &config.content.boot_steps {
            self.token.sleep(Duration::from_millis(step.delay_ms)).await?;
            let simulator = TypingSimulator::new(
                step.text.clone(),
                jittered(config.timing.boot_typing, self.fork_rng()?),
            );
            type_into(&self.main, &self.shared.style, step.kind, simulator, &self.token).await?;
        }
        Ok(())
    }

    async fn prompt_user_interaction(&self) -> Result<WaitResult> {
        // Only input arriving from here on counts
        let mut listener = self.shared.input.listen();
        listener.mark_seen();

        let question = format!("{INTERACTIVE_PROMPT} ");
        self.main.set_pending(self.shared.style.format_partial(
            LineKind::Interactive,
            MAIN_TAG,
            &question,
        ))?;

        let wait = InteractionWait::new(self.shared.config.timing.interaction_timeout());
        let result = wait.wait(&mut listener, &self.token).await?;

        if result.condition_met {
            info!("User input after {}ms", result.waited_ms);
        } else {
            info!("No input within {}ms, continuing", result.waited_ms);
        }
        self.shared.emit(SequenceEvent::InteractionResolved {
            observed: result.condition_met,
            waited_ms: result.waited_ms,
        });
        Ok(result)
    }

    async fn create_matrix_terminal_explosion(&self) -> Result<usize> {
        self.current()?.used_positions.clear();

        let config = &self.shared.config;
        let style = &self.shared.style;
        let target = &config.content.target_file;

        let simulator = TypingSimulator::new(
            target.clone(),
            jittered(config.timing.target_typing, self.fork_rng()?),
        )
        .with_prefix(format!("{INTERACTIVE_PROMPT} "));
        type_into(&self.main, style, LineKind::Interactive, simulator, &self.token).await?;

        self.token.sleep(config.timing.access_pause()).await?;
        self.main
            .append_line(style.format(LineKind::System, MAIN_TAG, &script::access_line(target)))?;
        self.token.sleep(config.timing.access_pause()).await?;
        self.main
            .append_line(style.format(LineKind::Success, MAIN_TAG, PROTOCOL_LINE))?;

        let count = config.explosion.window_count;
        let mut storms = JoinSet::new();
        let mut windows = Vec::with_capacity(count);

        // The main terminal storms alongside the explosion windows
        let main_storm = MatrixStorm::main_terminal(
            self.main.clone(),
            Arc::clone(&self.shared.generator),
            StormPlan::from_settings(&config.storm),
            style.clone(),
        );
        storms.spawn(main_storm.execute_matrix_text_storm(self.fork_rng()?, self.token.clone()));

        for index in 0..count {
            if index > 0 {
                self.token.sleep(config.explosion.spawn_stagger()).await?;
            }
            let (storm, rng) = self.spawn_explosion_window(index)?;
            windows.push(storm.window.id());
            storms.spawn(storm.execute_matrix_text_storm(rng, self.token.clone()));
        }

        let mut lines = 0;
        while let Some(joined) = storms.join_next().await {
            lines += joined.map_err(|e| {
                if e.is_cancelled() {
                    Error::Cancelled
                } else {
                    Error::Other(format!("storm task failed: {e}"))
                }
            })??;
        }
        debug!("{} storms finished, {} lines", count + 1, lines);

        for id in windows {
            self.container.unmount(id)?;
        }
        Ok(lines)
    }

    fn spawn_explosion_window(&self, index: usize) -> Result<(MatrixStorm, StdRng)> {
        let kind = ExplosionKind::cycle(index);

        let (allocation, storm_rng) = {
            let mut guard = self.current()?;
            let state = &mut *guard;
            let allocation = self
                .shared
                .allocator
                .allocate(&state.used_positions, &mut state.rng);
            state.used_positions.insert(allocation.placement.position);
            (allocation, StdRng::seed_from_u64(state.rng.gen()))
        };

        if allocation.fallback {
            debug!("No free anchor for window {}, reusing origin", index);
        }

        let window = TerminalWindow::explosion(
            kind.title(),
            kind.tag(),
            allocation.placement,
            self.shared.config.explosion_window_size(),
        );
        let id = self.container.mount(window)?;
        debug!(
            "Explosion window {} '{}' at {} (layer {}, {} attempts)",
            index,
            kind.title(),
            allocation.placement.position,
            allocation.placement.layer,
            allocation.attempts
        );

        let storm = MatrixStorm::explosion(
            self.container.window(id),
            kind,
            Arc::clone(&self.shared.generator),
            StormPlan::from_settings(&self.shared.config.storm),
            self.shared.style.clone(),
        );
        Ok((storm, storm_rng))
    }

    fn add_matrix_final_messages(&self) -> Result<()> {
        for message in FINAL_MESSAGES {
            self.main
                .append_line(self.shared.style.format(LineKind::Success, FINAL_TAG, message))?;
        }
        Ok(())
    }

    async fn redirect_to_home(&self) -> Result<()> {
        let config = &self.shared.config;
        let notice = script::redirect_line(&config.content.target_file);
        self.main
            .append_line(self.shared.style.format(LineKind::Redirect, MAIN_TAG, &notice))?;

        self.token.sleep(config.timing.settle_delay()).await?;

        {
            let mut state = self.current()?;
            self.advance(&mut state, Phase::Terminated)?;
            if let Some(container) = state.container.take() {
                container.destroy();
            }
            state.main_window = None;
            state.canceller = None;
            // Detach: this is the chain task itself
            state.chain = None;
        }

        let destination = &config.redirect.destination;
        info!("Redirecting to {}", destination);
        self.shared.emit(SequenceEvent::Redirected {
            run: self.run_id,
            destination: destination.clone(),
        });
        self.shared.navigator.navigate(destination);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SequenceController {
        let config = SequenceConfig {
            seed: Some(1),
            ..SequenceConfig::default()
        };
        SequenceController::new(config, |_: &str| {}).unwrap()
    }

    #[test]
    fn test_new_controller_is_idle() {
        let controller = controller();
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(!controller.is_running());
        assert!(controller.run_id().is_none());
        assert!(controller.phase_history().is_empty());
        assert!(controller.snapshot().is_none());
        assert!(!controller.container().is_alive());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = SequenceConfig::default();
        config.explosion.window_count = 0;
        assert!(SequenceController::new(config, |_: &str| {}).is_err());
    }

    #[test]
    fn test_init_outside_runtime_fails() {
        let controller = controller();
        assert!(matches!(controller.init(), Err(Error::Other(_))));
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_mounts_main_window() {
        let controller = controller();
        let run = controller.init().unwrap();

        assert_eq!(controller.run_id(), Some(run));
        assert_eq!(controller.phase(), Phase::Booting);
        assert_eq!(controller.generation(), 1);
        assert!(controller.main_window().is_some());

        let snapshot = controller.snapshot().unwrap();
        assert_eq!(snapshot.windows.len(), 1);
        assert_eq!(snapshot.windows[0].title, "xiaoOS v2.1 - Main Terminal");
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_init_rejected() {
        let controller = controller();
        controller.init().unwrap();
        assert!(matches!(
            controller.init(),
            Err(Error::AlreadyRunning(Phase::Booting))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_before_init_rejected() {
        let controller = controller();
        assert!(matches!(controller.restart(), Err(Error::NotStarted)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_tears_down_container() {
        let controller = controller();
        controller.init().unwrap();
        let container = controller.container();
        assert!(container.is_alive());

        drop(controller);
        assert!(!container.is_alive());
    }
}
