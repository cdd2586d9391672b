//! Character-by-character typing.

use std::time::Duration;

use rand::Rng;

use bootseq_core::{Line, LineKind, PromptStyle, Result, TypingSpeed};
use bootseq_display::WindowRef;

use crate::timer::RunToken;

/// One revealed character: the text shown after it, and the pause before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keystroke {
    /// Text revealed so far, prefix included
    pub revealed: String,
    /// Delay before this character appears
    pub delay: Duration,
}

/// Yields a [`Keystroke`] per character of `text`.
///
/// Finite and consumed once: a fresh simulator is created for every line.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use bootseq_engine::TypingSimulator;
///
/// let keystrokes: Vec<_> = TypingSimulator::new("ab", || Duration::from_millis(10)).collect();
/// assert_eq!(keystrokes.len(), 2);
/// assert_eq!(keystrokes[1].revealed, "ab");
/// ```
#[derive(Debug)]
pub struct TypingSimulator<F> {
    prefix: String,
    text: String,
    cursor: usize,
    delay: F,
}

impl<F: FnMut() -> Duration> TypingSimulator<F> {
    /// Type `text`, asking `delay` for the pause before each character.
    pub fn new(text: impl Into<String>, delay: F) -> Self {
        Self {
            prefix: String::new(),
            text: text.into(),
            cursor: 0,
            delay,
        }
    }

    /// Continue typing after text that is already on screen.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Full text once every character is revealed.
    pub fn full_text(&self) -> String {
        format!("{}{}", self.prefix, self.text)
    }

    /// Characters not yet revealed.
    pub fn remaining(&self) -> usize {
        self.text[self.cursor..].chars().count()
    }
}

impl<F: FnMut() -> Duration> Iterator for TypingSimulator<F> {
    type Item = Keystroke;

    fn next(&mut self) -> Option<Keystroke> {
        let ch = self.text[self.cursor..].chars().next()?;
        self.cursor += ch.len_utf8();
        Some(Keystroke {
            revealed: format!("{}{}", self.prefix, &self.text[..self.cursor]),
            delay: (self.delay)(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

/// Delay source producing `base + uniform(0..jitter)` per keystroke.
pub fn jittered<R: Rng>(speed: TypingSpeed, mut rng: R) -> impl FnMut() -> Duration {
    move || {
        let jitter = if speed.jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..speed.jitter_ms)
        };
        Duration::from_millis(speed.base_ms.saturating_add(jitter))
    }
}

/// Type a line into a window, one keystroke at a time.
///
/// Each keystroke waits through `token`, then redraws the pending line with
/// a trailing cursor. The finished line is committed and returned. A
/// cancelled run stops before the next reveal.
pub async fn type_into<F>(
    window: &WindowRef,
    style: &PromptStyle,
    kind: LineKind,
    mut simulator: TypingSimulator<F>,
    token: &RunToken,
) -> Result<Line>
where
    F: FnMut() -> Duration,
{
    let tag = window.tag()?;
    let full = simulator.full_text();

    for keystroke in simulator.by_ref() {
        token.sleep(keystroke.delay).await?;
        window.set_pending(style.format_partial(kind, &tag, &keystroke.revealed))?;
    }

    let line = style.format(kind, &tag, &full);
    window.commit_pending(line.clone())?;
    Ok(line)
}
