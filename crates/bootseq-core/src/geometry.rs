//! Geometry types for screen-space anchors and window regions.

use serde::{Deserialize, Serialize};

/// Anchor point on the screen, in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column offset (0-based)
    pub x: u16,
    /// Row offset (0-based)
    pub y: u16,
}

impl Position {
    /// Create a new position.
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Origin position (0, 0).
    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of the display or of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of rows
    pub rows: u16,
    /// Number of columns
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Total cell count (rows * cols).
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Whether either side is zero.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(40, 140)
    }
}

/// Rectangular region on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Left column
    pub x: u16,
    /// Top row
    pub y: u16,
    /// Width in columns
    pub width: u16,
    /// Height in rows
    pub height: u16,
}

impl Bounds {
    /// Create new bounds.
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds anchored at `position` with the given size.
    pub fn at(position: Position, size: Dimensions) -> Self {
        Self::new(position.x, position.y, size.cols, size.rows)
    }

    /// Check if a position is contained within these bounds.
    pub fn contains(&self, pos: &Position) -> bool {
        pos.y >= self.y
            && pos.y < self.y.saturating_add(self.height)
            && pos.x >= self.x
            && pos.x < self.x.saturating_add(self.width)
    }

    /// Check if these bounds intersect with another bounds.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.y.saturating_add(self.height) <= other.y
            || other.y.saturating_add(other.height) <= self.y
            || self.x.saturating_add(self.width) <= other.x
            || other.x.saturating_add(other.width) <= self.x)
    }

    /// Top-left corner.
    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Where and how a window sits on the screen.
///
/// Only `position` takes part in duplicate detection; `tilt` and `layer`
/// are cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Anchor of the window's top-left corner
    pub position: Position,
    /// Rotation in degrees (-2..=2)
    pub tilt: i8,
    /// Draw order, higher is drawn later
    pub layer: u8,
}

impl Placement {
    /// Layer used for the main terminal.
    pub const MAIN_LAYER: u8 = 10;

    /// Create a new placement.
    pub fn new(position: Position, tilt: i8, layer: u8) -> Self {
        Self {
            position,
            tilt,
            layer,
        }
    }

    /// Untilted placement on the main layer.
    pub fn main(position: Position) -> Self {
        Self::new(position, 0, Self::MAIN_LAYER)
    }
}
