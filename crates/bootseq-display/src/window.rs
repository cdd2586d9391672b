//! Terminal windows: rectangular panels with an append-only line buffer.

use serde::{Deserialize, Serialize};

use bootseq_core::{Bounds, Dimensions, Line, Placement, Position, WindowId, WindowRole};

/// One rectangular text panel.
///
/// Committed lines are append-only for the lifetime of the window. A line
/// that is still being typed lives in `pending` until it is committed.
#[derive(Debug, Clone)]
pub struct TerminalWindow {
    id: WindowId,
    title: String,
    role: WindowRole,
    /// Prompt host suffix, e.g. `main` or `network`
    tag: String,
    placement: Placement,
    size: Dimensions,
    lines: Vec<Line>,
    pending: Option<Line>,
}

impl TerminalWindow {
    /// Create a new window.
    pub fn new(
        title: impl Into<String>,
        role: WindowRole,
        tag: impl Into<String>,
        placement: Placement,
        size: Dimensions,
    ) -> Self {
        Self {
            id: WindowId::new(),
            title: title.into(),
            role,
            tag: tag.into(),
            placement,
            size,
            lines: Vec::new(),
            pending: None,
        }
    }

    /// Create the main boot terminal.
    pub fn main(title: impl Into<String>, placement: Placement, size: Dimensions) -> Self {
        Self::new(title, WindowRole::Main, "main", placement, size)
    }

    /// Create an ephemeral explosion window.
    pub fn explosion(
        title: impl Into<String>,
        tag: impl Into<String>,
        placement: Placement,
        size: Dimensions,
    ) -> Self {
        Self::new(title, WindowRole::Explosion, tag, placement, size)
    }

    /// Window identifier.
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Title shown in the header.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Main or explosion.
    pub fn role(&self) -> WindowRole {
        self.role
    }

    /// Whether this is the main boot terminal.
    pub fn is_main(&self) -> bool {
        self.role == WindowRole::Main
    }

    /// Prompt tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Placement on screen.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Anchor position.
    pub fn position(&self) -> Position {
        self.placement.position
    }

    /// Window size including the border.
    pub fn size(&self) -> Dimensions {
        self.size
    }

    /// Screen region covered by the window.
    pub fn bounds(&self) -> Bounds {
        Bounds::at(self.placement.position, self.size)
    }

    /// Rows available for text inside the border.
    pub fn content_rows(&self) -> usize {
        self.size.rows.saturating_sub(2) as usize
    }

    /// Append a committed line.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Committed lines, oldest first.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of committed lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Replace the line being typed.
    pub fn set_pending(&mut self, line: Line) {
        self.pending = Some(line);
    }

    /// The line being typed, if any.
    pub fn pending(&self) -> Option<&Line> {
        self.pending.as_ref()
    }

    /// Commit `line` as the final form of the pending line.
    pub fn commit_pending(&mut self, line: Line) {
        self.pending = None;
        self.lines.push(line);
    }

    /// Snapshot of what the window currently shows.
    pub fn view(&self) -> WindowView {
        let rows = self.content_rows();
        let mut visible: Vec<String> = self
            .lines
            .iter()
            .chain(self.pending.iter())
            .map(|line| line.text.clone())
            .collect();
        if visible.len() > rows {
            visible.drain(..visible.len() - rows);
        }

        WindowView {
            id: self.id,
            title: self.title.clone(),
            role: self.role,
            placement: self.placement,
            size: self.size,
            visible,
            total_lines: self.lines.len(),
        }
    }
}

/// Read-only view of a window at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowView {
    /// Window identifier
    pub id: WindowId,
    /// Title
    pub title: String,
    /// Main or explosion
    pub role: WindowRole,
    /// Placement on screen
    pub placement: Placement,
    /// Window size including the border
    pub size: Dimensions,
    /// Tail of the buffer that fits the window, pending line last
    pub visible: Vec<String>,
    /// Number of committed lines
    pub total_lines: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootseq_core::LineKind;

    fn window(rows: u16) -> TerminalWindow {
        TerminalWindow::explosion(
            "Network Scanner",
            "network",
            Placement::new(Position::new(10, 4), 1, 16),
            Dimensions::new(rows, 40),
        )
    }

    #[test]
    fn test_window_creation() {
        let w = window(10);
        assert_eq!(w.title(), "Network Scanner");
        assert_eq!(w.tag(), "network");
        assert_eq!(w.role(), WindowRole::Explosion);
        assert!(!w.is_main());
        assert_eq!(w.position(), Position::new(10, 4));
        assert_eq!(w.bounds(), Bounds::new(10, 4, 40, 10));
        assert_eq!(w.line_count(), 0);
    }

    #[test]
    fn test_main_window() {
        let w = TerminalWindow::main(
            "xiaoOS v2.1 - Main Terminal",
            Placement::main(Position::origin()),
            Dimensions::new(20, 80),
        );
        assert!(w.is_main());
        assert_eq!(w.tag(), "main");
    }

    #[test]
    fn test_add_line_is_ordered() {
        let mut w = window(10);
        w.add_line(Line::plain("one"));
        w.add_line(Line::plain("two"));
        w.add_line(Line::plain("three"));

        let texts: Vec<&str> = w.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_pending_commit() {
        let mut w = window(10);
        w.set_pending(Line::new(LineKind::System, "[SYSTEM] Ini_"));
        assert_eq!(w.line_count(), 0);
        assert!(w.pending().is_some());

        w.commit_pending(Line::new(LineKind::System, "[SYSTEM] Init"));
        assert!(w.pending().is_none());
        assert_eq!(w.line_count(), 1);
        assert_eq!(w.lines()[0].text, "[SYSTEM] Init");
    }

    #[test]
    fn test_view_shows_tail_and_pending() {
        let mut w = window(5); // 3 content rows
        for i in 0..5 {
            w.add_line(Line::plain(format!("line {i}")));
        }
        w.set_pending(Line::plain("typing_"));

        let view = w.view();
        assert_eq!(view.visible, vec!["line 3", "line 4", "typing_"]);
        assert_eq!(view.total_lines, 5);
    }

    #[test]
    fn test_window_ids_unique() {
        assert_ne!(window(10).id(), window(10).id());
    }
}
