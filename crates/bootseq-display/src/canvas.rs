//! Character canvas that composites windows into a text frame.

use bootseq_core::{Bounds, Dimensions, WindowRole};

use crate::container::ContainerSnapshot;
use crate::window::WindowView;

/// Header controls drawn on every window (close, minimize, maximize).
const CONTROLS: &str = "● ● ●";

/// Fixed-size character grid.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Cell storage (row-major order)
    cells: Vec<char>,
    dimensions: Dimensions,
}

impl Canvas {
    /// Create a blank canvas.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            cells: vec![' '; dimensions.cell_count()],
            dimensions,
        }
    }

    /// Composite every window of a snapshot in draw order.
    pub fn render(snapshot: &ContainerSnapshot) -> Self {
        let mut canvas = Self::new(snapshot.dimensions);
        for window in &snapshot.windows {
            canvas.draw_window(window);
        }
        canvas
    }

    /// Canvas dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Character at (x, y), or None if out of bounds.
    pub fn cell(&self, x: u16, y: u16) -> Option<char> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set the character at (x, y); out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, ch: char) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = ch;
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if y < self.dimensions.rows && x < self.dimensions.cols {
            Some(y as usize * self.dimensions.cols as usize + x as usize)
        } else {
            None
        }
    }

    /// Write `text` starting at (x, y), stopping at the right edge of `clip`.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, clip: &Bounds) {
        let right = clip.x.saturating_add(clip.width);
        for (offset, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(offset) else {
                break;
            };
            let col = x.saturating_add(offset);
            if col >= right {
                break;
            }
            self.set(col, y, ch);
        }
    }

    /// Fill a region with `ch`.
    pub fn fill(&mut self, bounds: &Bounds, ch: char) {
        for row in bounds.y..bounds.y.saturating_add(bounds.height) {
            for col in bounds.x..bounds.x.saturating_add(bounds.width) {
                self.set(col, row, ch);
            }
        }
    }

    /// Draw one window: border, header and the visible tail of its lines.
    ///
    /// Windows occlude whatever was drawn beneath them.
    pub fn draw_window(&mut self, window: &WindowView) {
        let bounds = Bounds::at(window.placement.position, window.size);
        if bounds.width < 2 || bounds.height < 2 {
            return;
        }

        let right = bounds.x + bounds.width - 1;
        let bottom = bounds.y + bounds.height - 1;

        self.fill(&bounds, ' ');

        for col in bounds.x + 1..right {
            self.set(col, bounds.y, '─');
            self.set(col, bottom, '─');
        }
        for row in bounds.y + 1..bottom {
            self.set(bounds.x, row, '│');
            self.set(right, row, '│');
        }
        let (tl, tr, bl, br) = match window.role {
            WindowRole::Main => ('╔', '╗', '╚', '╝'),
            WindowRole::Explosion => ('┌', '┐', '└', '┘'),
        };
        self.set(bounds.x, bounds.y, tl);
        self.set(right, bounds.y, tr);
        self.set(bounds.x, bottom, bl);
        self.set(right, bottom, br);

        let inner = Bounds::new(bounds.x + 1, bounds.y, bounds.width - 2, bounds.height);
        let header = format!(" {CONTROLS} {} ", window.title);
        self.put_str(bounds.x + 1, bounds.y, &header, &inner);

        for (row, text) in window.visible.iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            let y = bounds.y + 1 + row;
            if y >= bottom {
                break;
            }
            self.put_str(bounds.x + 1, y, text, &inner);
        }
    }

    /// Extract text from a specific region.
    ///
    /// Trailing whitespace is trimmed from each line.
    pub fn extract_text(&self, bounds: &Bounds) -> String {
        let mut text = String::new();
        for row_idx in bounds.y..(bounds.y.saturating_add(bounds.height)) {
            if row_idx > bounds.y {
                text.push('\n');
            }
            for col_idx in bounds.x..(bounds.x.saturating_add(bounds.width)) {
                if let Some(ch) = self.cell(col_idx, row_idx) {
                    text.push(ch);
                }
            }
        }
        text.lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert entire canvas to plain text.
    pub fn to_plain_text(&self) -> String {
        let bounds = Bounds::new(0, 0, self.dimensions.cols, self.dimensions.rows);
        self.extract_text(&bounds)
    }
}
