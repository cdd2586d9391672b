//! Glyph storms: the rapid text that fills every explosion window.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use bootseq_core::{Error, Line, LineKind, PromptStyle, Result, StormSettings};
use bootseq_display::WindowRef;

use crate::script::{ExplosionKind, MAIN_PHRASES, MAIN_TAG};
use crate::timer::RunToken;

/// Draws random glyph lines from a fixed alphabet.
///
/// Output depends only on the alphabet and the injected RNG, so a seeded
/// RNG reproduces a storm exactly.
#[derive(Debug, Clone)]
pub struct GlyphStormGenerator {
    alphabet: Vec<char>,
}

impl GlyphStormGenerator {
    /// Create a generator; whitespace in `alphabet` is ignored.
    pub fn new(alphabet: &str) -> Result<Self> {
        let alphabet: Vec<char> = alphabet.chars().filter(|c| !c.is_whitespace()).collect();
        if alphabet.is_empty() {
            return Err(Error::Config("glyph alphabet cannot be empty".to_string()));
        }
        Ok(Self { alphabet })
    }

    /// Glyphs lines are drawn from.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// A line of `width` random glyphs.
    pub fn generate_line<R: Rng + ?Sized>(&self, width: usize, rng: &mut R) -> String {
        (0..width)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())])
            .collect()
    }
}

/// Shape of one window's storm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StormPlan {
    /// Lines appended
    pub ticks: usize,
    /// Interval between lines
    pub tick: Duration,
    /// Glyph line width
    pub line_width: usize,
    /// Probability of a phrase instead of glyphs
    pub phrase_chance: f64,
}

impl StormPlan {
    /// Build a plan; out-of-range phrase chances are clamped.
    pub fn new(ticks: usize, tick: Duration, line_width: usize, phrase_chance: f64) -> Self {
        let phrase_chance = if phrase_chance.is_nan() {
            0.0
        } else {
            phrase_chance.clamp(0.0, 1.0)
        };
        Self {
            ticks,
            tick,
            line_width,
            phrase_chance,
        }
    }

    /// Plan from configuration.
    pub fn from_settings(settings: &StormSettings) -> Self {
        Self::new(
            settings.ticks,
            settings.tick(),
            settings.line_width,
            settings.phrase_chance,
        )
    }

    /// Total storm duration.
    pub fn duration(&self) -> Duration {
        self.tick.saturating_mul(u32::try_from(self.ticks).unwrap_or(u32::MAX))
    }
}

/// One window's storm, ready to run as its own task.
#[derive(Debug, Clone)]
pub struct MatrixStorm {
    /// Target window
    pub window: WindowRef,
    /// Prompt tag of phrase lines
    pub tag: &'static str,
    /// Phrase pool
    pub phrases: &'static [&'static str],
    /// Shared glyph generator
    pub generator: Arc<GlyphStormGenerator>,
    /// Timing and shape
    pub plan: StormPlan,
    /// Prompt style of phrase lines
    pub style: PromptStyle,
}

impl MatrixStorm {
    /// Storm for an explosion window of `kind`.
    pub fn explosion(
        window: WindowRef,
        kind: ExplosionKind,
        generator: Arc<GlyphStormGenerator>,
        plan: StormPlan,
        style: PromptStyle,
    ) -> Self {
        Self {
            window,
            tag: kind.tag(),
            phrases: kind.phrases(),
            generator,
            plan,
            style,
        }
    }

    /// Storm for the main terminal: phrases only, never glyphs.
    pub fn main_terminal(
        window: WindowRef,
        generator: Arc<GlyphStormGenerator>,
        plan: StormPlan,
        style: PromptStyle,
    ) -> Self {
        Self {
            window,
            tag: MAIN_TAG,
            phrases: MAIN_PHRASES,
            generator,
            plan: StormPlan {
                phrase_chance: 1.0,
                ..plan
            },
            style,
        }
    }

    /// The next line of the storm.
    pub fn next_line<R: Rng + ?Sized>(&self, rng: &mut R) -> Line {
        if !self.phrases.is_empty() && rng.gen_bool(self.plan.phrase_chance) {
            let phrase = self.phrases[rng.gen_range(0..self.phrases.len())];
            self.style.format(LineKind::Matrix, self.tag, phrase)
        } else {
            let glyphs = self.generator.generate_line(self.plan.line_width, rng);
            self.style.format(LineKind::Glyph, self.tag, &glyphs)
        }
    }

    /// Append one line per tick until the plan is exhausted.
    ///
    /// Returns the number of lines appended. Stops with a cancellation error
    /// as soon as the run is cancelled or the window is gone.
    pub async fn execute_matrix_text_storm(self, mut rng: StdRng, token: RunToken) -> Result<usize> {
        debug!(
            "Storm starting: window={}, tag={}, ticks={}",
            self.window.id(),
            self.tag,
            self.plan.ticks
        );

        for _ in 0..self.plan.ticks {
            token.sleep(self.plan.tick).await?;
            let line = self.next_line(&mut rng);
            self.window.append_line(line)?;
        }

        debug!("Storm finished: window={}", self.window.id());
        Ok(self.plan.ticks)
    }
}
