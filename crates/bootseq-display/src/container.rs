//! The animation container: visual root that owns every mounted window.
//!
//! The container is uniquely owned by the sequence controller. Phase tasks
//! only ever hold a [`ContainerRef`] (a weak reference), so once the owner
//! destroys or drops the container, every operation through a stale
//! reference fails with [`Error::ContainerDestroyed`] instead of touching a
//! torn-down window.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use bootseq_core::{Dimensions, Error, Line, Result, SequenceEvent, WindowId, WindowRole};

use crate::window::{TerminalWindow, WindowView};

#[derive(Debug, Default)]
struct ContainerState {
    /// Mounted windows in mount order
    windows: Vec<TerminalWindow>,
    destroyed: bool,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<ContainerState>,
    dimensions: Dimensions,
    events: Option<broadcast::Sender<SequenceEvent>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ContainerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SequenceEvent) {
        if let Some(events) = &self.events {
            // No subscribers is fine
            let _ = events.send(event);
        }
    }

    fn mount(&self, window: TerminalWindow) -> Result<WindowId> {
        let mut state = self.lock();
        if state.destroyed {
            return Err(Error::ContainerDestroyed);
        }

        let id = window.id();
        debug!(
            "Mounting window: id={}, title='{}', role={:?}, position={}",
            id,
            window.title(),
            window.role(),
            window.position()
        );
        self.emit(SequenceEvent::WindowMounted {
            window: id,
            title: window.title().to_string(),
            role: window.role(),
            placement: window.placement(),
        });
        state.windows.push(window);
        Ok(id)
    }

    fn unmount(&self, id: WindowId) -> Option<TerminalWindow> {
        let mut state = self.lock();
        let index = state.windows.iter().position(|w| w.id() == id)?;
        let window = state.windows.remove(index);
        debug!("Unmounted window: id={}, lines={}", id, window.line_count());
        self.emit(SequenceEvent::WindowUnmounted { window: id });
        Some(window)
    }

    fn destroy(&self) -> usize {
        let mut state = self.lock();
        if state.destroyed {
            return 0;
        }
        state.destroyed = true;

        let released: Vec<TerminalWindow> = state.windows.drain(..).collect();
        for window in &released {
            self.emit(SequenceEvent::WindowUnmounted { window: window.id() });
        }
        debug!("Container destroyed: released {} windows", released.len());
        released.len()
    }

    fn with_window<R>(&self, id: WindowId, f: impl FnOnce(&mut TerminalWindow) -> R) -> Result<R> {
        let mut state = self.lock();
        if state.destroyed {
            return Err(Error::ContainerDestroyed);
        }
        let window = state
            .windows
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or(Error::WindowNotMounted(id))?;
        Ok(f(window))
    }

    fn append_line(&self, id: WindowId, line: Line) -> Result<()> {
        self.with_window(id, |w| w.add_line(line.clone()))?;
        self.emit(SequenceEvent::LineAppended { window: id, line });
        Ok(())
    }

    fn commit_pending(&self, id: WindowId, line: Line) -> Result<()> {
        self.with_window(id, |w| w.commit_pending(line.clone()))?;
        self.emit(SequenceEvent::LineAppended { window: id, line });
        Ok(())
    }

    fn snapshot(&self) -> ContainerSnapshot {
        let state = self.lock();
        let mut windows: Vec<WindowView> = state.windows.iter().map(TerminalWindow::view).collect();
        // Stable sort keeps mount order within a layer
        windows.sort_by_key(|w| w.placement.layer);

        ContainerSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            dimensions: self.dimensions,
            windows,
        }
    }
}

/// Visual root under which all terminal windows are mounted.
#[derive(Debug)]
pub struct AnimationContainer {
    shared: Arc<Shared>,
}

impl AnimationContainer {
    /// Create an empty container covering `dimensions`.
    pub fn new(dimensions: Dimensions) -> Self {
        Self::build(dimensions, None)
    }

    /// Create a container that reports mounts and appends on `events`.
    pub fn with_events(dimensions: Dimensions, events: broadcast::Sender<SequenceEvent>) -> Self {
        Self::build(dimensions, Some(events))
    }

    fn build(dimensions: Dimensions, events: Option<broadcast::Sender<SequenceEvent>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ContainerState::default()),
                dimensions,
                events,
            }),
        }
    }

    /// Screen dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.shared.dimensions
    }

    /// Mount a window.
    pub fn mount(&self, window: TerminalWindow) -> Result<WindowId> {
        self.shared.mount(window)
    }

    /// Unmount a window, returning it if it was mounted.
    pub fn unmount(&self, id: WindowId) -> Option<TerminalWindow> {
        self.shared.unmount(id)
    }

    /// Unmount and release every window.
    ///
    /// Idempotent: returns the number of windows released, 0 on repeat calls.
    pub fn destroy(&self) -> usize {
        self.shared.destroy()
    }

    /// Whether `destroy()` has been called.
    pub fn is_destroyed(&self) -> bool {
        self.shared.lock().destroyed
    }

    /// Number of mounted windows.
    pub fn window_count(&self) -> usize {
        self.shared.lock().windows.len()
    }

    /// Number of mounted explosion windows.
    pub fn explosion_count(&self) -> usize {
        self.shared
            .lock()
            .windows
            .iter()
            .filter(|w| w.role() == WindowRole::Explosion)
            .count()
    }

    /// Run `f` against a mounted window.
    pub fn with_window<R>(&self, id: WindowId, f: impl FnOnce(&mut TerminalWindow) -> R) -> Result<R> {
        self.shared.with_window(id, f)
    }

    /// Point-in-time view of every window.
    pub fn snapshot(&self) -> ContainerSnapshot {
        self.shared.snapshot()
    }

    /// Weak reference for phase tasks.
    pub fn downgrade(&self) -> ContainerRef {
        ContainerRef {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

/// Weak reference to an [`AnimationContainer`].
#[derive(Debug, Clone, Default)]
pub struct ContainerRef {
    shared: Weak<Shared>,
}

impl ContainerRef {
    fn acquire(&self) -> Result<Arc<Shared>> {
        let shared = self.shared.upgrade().ok_or(Error::ContainerDestroyed)?;
        if shared.lock().destroyed {
            return Err(Error::ContainerDestroyed);
        }
        Ok(shared)
    }

    /// Whether the container still exists and has not been destroyed.
    pub fn is_alive(&self) -> bool {
        self.acquire().is_ok()
    }

    /// Mount a window.
    pub fn mount(&self, window: TerminalWindow) -> Result<WindowId> {
        self.acquire()?.mount(window)
    }

    /// Unmount a window.
    pub fn unmount(&self, id: WindowId) -> Result<Option<TerminalWindow>> {
        Ok(self.acquire()?.unmount(id))
    }

    /// Reference to one mounted window.
    pub fn window(&self, id: WindowId) -> WindowRef {
        WindowRef {
            container: self.clone(),
            window: id,
        }
    }

    /// Point-in-time view, if the container is alive.
    pub fn snapshot(&self) -> Result<ContainerSnapshot> {
        Ok(self.acquire()?.snapshot())
    }
}

/// Weak reference to one window inside a container.
#[derive(Debug, Clone)]
pub struct WindowRef {
    container: ContainerRef,
    window: WindowId,
}

impl WindowRef {
    /// Window identifier.
    pub fn id(&self) -> WindowId {
        self.window
    }

    /// Append a committed line.
    pub fn append_line(&self, line: Line) -> Result<()> {
        self.container.acquire()?.append_line(self.window, line)
    }

    /// Replace the line being typed.
    pub fn set_pending(&self, line: Line) -> Result<()> {
        self.container
            .acquire()?
            .with_window(self.window, |w| w.set_pending(line))
    }

    /// Commit the line being typed in its final form.
    pub fn commit_pending(&self, line: Line) -> Result<()> {
        self.container.acquire()?.commit_pending(self.window, line)
    }

    /// Read the window's prompt tag.
    pub fn tag(&self) -> Result<String> {
        self.container
            .acquire()?
            .with_window(self.window, |w| w.tag().to_string())
    }

    /// Number of committed lines.
    pub fn line_count(&self) -> Result<usize> {
        self.container
            .acquire()?
            .with_window(self.window, |w| w.line_count())
    }

    /// Whether the window is still mounted in a live container.
    pub fn is_alive(&self) -> bool {
        self.line_count().is_ok()
    }
}

/// Point-in-time view of a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    /// RFC 3339 capture time
    pub timestamp: String,
    /// Screen dimensions
    pub dimensions: Dimensions,
    /// Windows in draw order (lowest layer first)
    pub windows: Vec<WindowView>,
}
