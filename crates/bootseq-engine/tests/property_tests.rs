//! Property-based tests for placement, glyph generation and typing.
//!
//! Uses proptest to generate random layouts and seeds.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::time::Duration;

use bootseq_core::{Dimensions, Position, TypingSpeed};
use bootseq_engine::typing::jittered;
use bootseq_engine::{GlyphStormGenerator, PositionAllocator, TypingSimulator, UsedPositions};

/// Display sizes with room for at least one window.
fn layout() -> impl Strategy<Value = (Dimensions, Dimensions)> {
    (12u16..60, 50u16..200).prop_flat_map(|(rows, cols)| {
        (3u16..=rows, 3u16..=cols).prop_map(move |(h, w)| {
            (Dimensions::new(rows, cols), Dimensions::new(h, w))
        })
    })
}

fn alphabet() -> impl Strategy<Value = String> {
    "[ -~ｱ-ﾝ]{1,40}".prop_filter("needs a visible glyph", |s| {
        s.chars().any(|c| !c.is_whitespace())
    })
}

proptest! {
    /// Windows placed by the allocator always fit on screen.
    #[test]
    fn allocations_stay_on_screen(
        (display, window) in layout(),
        step_x in 1u16..20,
        step_y in 1u16..8,
        seed in any::<u64>(),
    ) {
        let allocator = PositionAllocator::new(display, window, step_x, step_y, 20);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut used = UsedPositions::new();

        for _ in 0..12 {
            let allocation = allocator.allocate(&used, &mut rng);
            let position = allocation.placement.position;
            prop_assert!(position.x + window.cols <= display.cols);
            prop_assert!(position.y + window.rows <= display.rows);
            prop_assert!((-2..=2).contains(&allocation.placement.tilt));
            prop_assert!((15..=19).contains(&allocation.placement.layer));
            used.insert(position);
        }
    }

    /// While the grid has room, every allocation is a fresh anchor.
    #[test]
    fn allocations_distinct_until_saturated(
        (display, window) in layout(),
        step_x in 1u16..20,
        step_y in 1u16..8,
        attempts in 0usize..30,
        seed in any::<u64>(),
    ) {
        let allocator = PositionAllocator::new(display, window, step_x, step_y, attempts);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut used = UsedPositions::new();
        let count = allocator.capacity().min(16);

        for _ in 0..count {
            let allocation = allocator.allocate(&used, &mut rng);
            prop_assert!(!allocation.fallback);
            prop_assert!(allocation.attempts <= attempts);
            prop_assert!(used.insert(allocation.placement.position));
        }

        if count == allocator.capacity() {
            let allocation = allocator.allocate(&used, &mut rng);
            prop_assert!(allocation.fallback);
            prop_assert_eq!(allocation.placement.position, Position::origin());
        }
    }

    /// Glyph lines have the requested width and only use the alphabet.
    #[test]
    fn glyph_lines_use_alphabet(alphabet in alphabet(), width in 0usize..120, seed in any::<u64>()) {
        let generator = GlyphStormGenerator::new(&alphabet).unwrap();
        let allowed: HashSet<char> = generator.alphabet().iter().copied().collect();

        let line = generator.generate_line(width, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(line.chars().count(), width);
        prop_assert!(line.chars().all(|c| allowed.contains(&c)));
    }

    /// Same seed, same storm.
    #[test]
    fn glyph_lines_reproducible(seed in any::<u64>()) {
        let generator = GlyphStormGenerator::new("ｱｲｳｴｵ0123456789").unwrap();
        let a = generator.generate_line(40, &mut StdRng::seed_from_u64(seed));
        let b = generator.generate_line(40, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a, b);
    }

    /// Typing reveals every prefix once and ends on the full text.
    #[test]
    fn typing_reveals_every_prefix(text in "\\PC{0,30}", base in 0u64..100, jitter in 0u64..100) {
        let delay = jittered(TypingSpeed::new(base, jitter), StdRng::seed_from_u64(0));
        let keystrokes: Vec<_> = TypingSimulator::new(text.clone(), delay).collect();

        prop_assert_eq!(keystrokes.len(), text.chars().count());
        for (i, keystroke) in keystrokes.iter().enumerate() {
            let expected: String = text.chars().take(i + 1).collect();
            prop_assert_eq!(&keystroke.revealed, &expected);
            prop_assert!(keystroke.delay >= Duration::from_millis(base));
            prop_assert!(keystroke.delay < Duration::from_millis(base + jitter.max(1)));
        }
    }
}
