//! Explosion window placement.
//!
//! Anchors lie on a grid inside the region where a whole window fits on
//! screen. The allocator draws random grid anchors, skipping those already
//! used in the current explosion; after a bounded number of misses it scans
//! the grid in row-major order, and only when every anchor is taken does it
//! fall back to the region origin.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use bootseq_core::{Dimensions, Placement, Position, SequenceConfig};

/// Lowest layer of explosion windows; they stack above the main window.
pub const EXPLOSION_LAYER_BASE: u8 = 15;

/// Number of distinct explosion layers.
pub const EXPLOSION_LAYERS: u8 = 5;

/// Maximum tilt, in degrees, either way.
pub const MAX_TILT: i8 = 2;

/// Anchors already taken during the current explosion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedPositions {
    positions: HashSet<Position>,
}

impl UsedPositions {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every anchor.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Record an anchor; false if it was already taken.
    pub fn insert(&mut self, position: Position) -> bool {
        self.positions.insert(position)
    }

    /// Whether an anchor is taken.
    pub fn contains(&self, position: &Position) -> bool {
        self.positions.contains(position)
    }

    /// Number of taken anchors.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no anchor is taken.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Taken anchors, sorted.
    pub fn to_vec(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.positions.iter().copied().collect();
        positions.sort();
        positions
    }
}

/// Outcome of one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Chosen placement
    pub placement: Placement,
    /// Random candidates drawn
    pub attempts: usize,
    /// Whether every anchor was taken and the origin was reused
    pub fallback: bool,
}

/// Picks unused anchors for explosion windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionAllocator {
    /// Largest anchor that keeps a window on screen
    max_anchor: Position,
    step_x: u16,
    step_y: u16,
    max_attempts: usize,
}

impl PositionAllocator {
    /// Create an allocator for `window`-sized windows on a `display`.
    ///
    /// Zero steps are treated as one.
    pub fn new(
        display: Dimensions,
        window: Dimensions,
        step_x: u16,
        step_y: u16,
        max_attempts: usize,
    ) -> Self {
        Self {
            max_anchor: Position::new(
                display.cols.saturating_sub(window.cols),
                display.rows.saturating_sub(window.rows),
            ),
            step_x: step_x.max(1),
            step_y: step_y.max(1),
            max_attempts,
        }
    }

    /// Allocator matching the explosion settings.
    pub fn from_config(config: &SequenceConfig) -> Self {
        Self::new(
            config.display_dimensions(),
            config.explosion_window_size(),
            config.explosion.grid_step_x,
            config.explosion.grid_step_y,
            config.explosion.max_placement_attempts,
        )
    }

    /// Grid columns.
    pub fn columns(&self) -> u16 {
        self.max_anchor.x / self.step_x + 1
    }

    /// Grid rows.
    pub fn rows(&self) -> u16 {
        self.max_anchor.y / self.step_y + 1
    }

    /// Number of distinct anchors.
    pub fn capacity(&self) -> usize {
        usize::from(self.columns()) * usize::from(self.rows())
    }

    /// Anchor of grid cell (column, row).
    pub fn anchor(&self, column: u16, row: u16) -> Position {
        Position::new(column * self.step_x, row * self.step_y)
    }

    /// Every anchor in row-major order.
    pub fn anchors(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows()).flat_map(move |row| (0..self.columns()).map(move |col| self.anchor(col, row)))
    }

    /// Choose a placement not in `used`.
    ///
    /// Never fails: a saturated grid yields the region origin with
    /// `fallback` set. The caller records the chosen anchor.
    pub fn allocate<R: Rng + ?Sized>(&self, used: &UsedPositions, rng: &mut R) -> Allocation {
        let mut attempts = 0;
        let mut chosen = None;

        while attempts < self.max_attempts {
            attempts += 1;
            let candidate = self.anchor(
                rng.gen_range(0..self.columns()),
                rng.gen_range(0..self.rows()),
            );
            if !used.contains(&candidate) {
                chosen = Some(candidate);
                break;
            }
        }

        if chosen.is_none() {
            chosen = self.anchors().find(|anchor| !used.contains(anchor));
            if let Some(anchor) = chosen {
                debug!("Random placement missed {} times, scanned to {}", attempts, anchor);
            }
        }

        let fallback = chosen.is_none();
        if fallback {
            debug!(
                "Placement grid saturated ({} anchors), reusing origin",
                self.capacity()
            );
        }

        let position = chosen.unwrap_or_else(Position::origin);
        let tilt = rng.gen_range(-MAX_TILT..=MAX_TILT);
        let layer = EXPLOSION_LAYER_BASE + rng.gen_range(0..EXPLOSION_LAYERS);

        Allocation {
            placement: Placement::new(position, tilt, layer),
            attempts,
            fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn allocator() -> PositionAllocator {
        PositionAllocator::new(Dimensions::new(40, 140), Dimensions::new(10, 44), 10, 4, 20)
    }

    #[test]
    fn test_grid_shape() {
        let allocator = allocator();
        // x anchors 0..=96 step 10, y anchors 0..=30 step 4
        assert_eq!(allocator.columns(), 10);
        assert_eq!(allocator.rows(), 8);
        assert_eq!(allocator.capacity(), 80);
        assert_eq!(allocator.anchors().count(), 80);
        assert_eq!(allocator.anchors().last(), Some(Position::new(90, 28)));
    }

    #[test]
    fn test_from_config() {
        let config = SequenceConfig::default();
        assert_eq!(PositionAllocator::from_config(&config), allocator());
    }

    #[test]
    fn test_allocations_are_distinct() {
        let allocator = allocator();
        let mut used = UsedPositions::new();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..8 {
            let allocation = allocator.allocate(&used, &mut rng);
            assert!(!allocation.fallback);
            assert!(used.insert(allocation.placement.position));
        }
        assert_eq!(used.len(), 8);
    }

    #[test]
    fn test_placement_ranges() {
        let allocator = allocator();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let placement = allocator.allocate(&UsedPositions::new(), &mut rng).placement;
            assert!((-2..=2).contains(&placement.tilt));
            assert!((15..=19).contains(&placement.layer));
            assert!(placement.position.x <= 96);
            assert!(placement.position.y <= 30);
        }
    }

    #[test]
    fn test_scan_after_attempts_exhausted() {
        // 2x1 grid, one anchor taken, zero random attempts allowed
        let allocator = PositionAllocator::new(Dimensions::new(10, 20), Dimensions::new(10, 10), 10, 4, 0);
        let mut used = UsedPositions::new();
        used.insert(Position::new(0, 0));

        let allocation = allocator.allocate(&used, &mut StdRng::seed_from_u64(1));
        assert_eq!(allocation.placement.position, Position::new(10, 0));
        assert_eq!(allocation.attempts, 0);
        assert!(!allocation.fallback);
    }

    #[test]
    fn test_saturated_grid_falls_back_to_origin() {
        let allocator = PositionAllocator::new(Dimensions::new(10, 20), Dimensions::new(10, 10), 10, 4, 20);
        let mut used = UsedPositions::new();
        for anchor in allocator.anchors() {
            used.insert(anchor);
        }

        let allocation = allocator.allocate(&used, &mut StdRng::seed_from_u64(1));
        assert!(allocation.fallback);
        assert_eq!(allocation.attempts, 20);
        assert_eq!(allocation.placement.position, Position::origin());
    }

    #[test]
    fn test_window_filling_display_has_single_anchor() {
        let allocator = PositionAllocator::new(Dimensions::new(10, 44), Dimensions::new(10, 44), 10, 4, 20);
        assert_eq!(allocator.capacity(), 1);
        let allocation = allocator.allocate(&UsedPositions::new(), &mut StdRng::seed_from_u64(1));
        assert_eq!(allocation.placement.position, Position::origin());
        assert_eq!(allocation.attempts, 1);
    }

    #[test]
    fn test_used_positions() {
        let mut used = UsedPositions::new();
        assert!(used.is_empty());
        assert!(used.insert(Position::new(20, 4)));
        assert!(used.insert(Position::new(0, 8)));
        assert!(!used.insert(Position::new(20, 4)));
        assert_eq!(used.to_vec(), vec![Position::new(0, 8), Position::new(20, 4)]);
        used.clear();
        assert!(used.is_empty());
    }
}
