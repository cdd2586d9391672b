//! Terminal line kinds and prompt formatting.

use serde::{Deserialize, Serialize};

/// Visual kind of a terminal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// `[SYSTEM]` prefixed status line
    System,
    /// Prompted line with trailing loading dots
    Loading,
    /// Prompted success message
    Success,
    /// Bare prompt with a blinking cursor
    Prompt,
    /// Prompted question awaiting the user
    Interactive,
    /// Prompted storm phrase
    Matrix,
    /// Raw glyph storm line
    Glyph,
    /// Final redirect notice
    Redirect,
    /// Unformatted text
    Plain,
}

impl LineKind {
    /// Whether lines of this kind are preceded by the shell prompt.
    pub fn is_prompted(self) -> bool {
        matches!(
            self,
            LineKind::Loading
                | LineKind::Success
                | LineKind::Prompt
                | LineKind::Interactive
                | LineKind::Matrix
                | LineKind::Redirect
        )
    }
}

/// A rendered line of terminal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line kind
    pub kind: LineKind,
    /// Fully rendered text, prompt included
    pub text: String,
}

impl Line {
    /// Create a line from already-rendered text.
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Unformatted line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(LineKind::Plain, text)
    }
}

/// Shell prompt style, `root@<hostname>-<tag>:~$`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptStyle {
    /// Host name shown in the prompt
    pub hostname: String,
}

impl PromptStyle {
    /// Cursor glyph appended to prompts and in-progress typing.
    pub const CURSOR: char = '_';

    /// Create a prompt style for a host.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// Prompt string for a window tag.
    pub fn prompt(&self, tag: &str) -> String {
        format!("root@{}-{}:~$", self.hostname, tag)
    }

    /// Render `body` as a line of `kind` in a window tagged `tag`.
    pub fn format(&self, kind: LineKind, tag: &str, body: &str) -> Line {
        let text = match kind {
            LineKind::System => format!("[SYSTEM] {body}"),
            LineKind::Loading => format!("{} {body} ...", self.prompt(tag)),
            LineKind::Prompt => format!("{} {}", self.prompt(tag), Self::CURSOR),
            LineKind::Redirect => format!("{} {body}", self.prompt("main")),
            LineKind::Success | LineKind::Interactive | LineKind::Matrix => {
                format!("{} {body}", self.prompt(tag))
            }
            LineKind::Glyph | LineKind::Plain => body.to_string(),
        };
        Line::new(kind, text)
    }

    /// Render a partially typed line, with the cursor at the end.
    pub fn format_partial(&self, kind: LineKind, tag: &str, revealed: &str) -> Line {
        let mut line = self.format(kind, tag, revealed);
        if kind != LineKind::Prompt {
            line.text.push(Self::CURSOR);
        }
        line
    }
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self::new("xiaoOS")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt() {
        let style = PromptStyle::default();
        assert_eq!(style.prompt("main"), "root@xiaoOS-main:~$");
    }

    #[test]
    fn test_format_kinds() {
        let style = PromptStyle::new("box");

        let line = style.format(LineKind::System, "main", "Loading kernel");
        assert_eq!(line.text, "[SYSTEM] Loading kernel");

        let line = style.format(LineKind::Loading, "main", "Mounting");
        assert_eq!(line.text, "root@box-main:~$ Mounting ...");

        let line = style.format(LineKind::Success, "network", "ready");
        assert_eq!(line.text, "root@box-network:~$ ready");

        let line = style.format(LineKind::Prompt, "main", "ignored");
        assert_eq!(line.text, "root@box-main:~$ _");

        let line = style.format(LineKind::Redirect, "final", "bye");
        assert_eq!(line.text, "root@box-main:~$ bye");

        let line = style.format(LineKind::Glyph, "crypto", "ｱｲｳ01");
        assert_eq!(line.text, "ｱｲｳ01");
        assert_eq!(line.kind, LineKind::Glyph);
    }

    #[test]
    fn test_format_partial_appends_cursor() {
        let style = PromptStyle::new("box");
        let line = style.format_partial(LineKind::System, "main", "Init");
        assert_eq!(line.text, "[SYSTEM] Init_");

        let line = style.format_partial(LineKind::Prompt, "main", "");
        assert_eq!(line.text, "root@box-main:~$ _");
    }

    #[test]
    fn test_is_prompted() {
        assert!(LineKind::Matrix.is_prompted());
        assert!(!LineKind::System.is_prompted());
        assert!(!LineKind::Glyph.is_prompted());
    }
}
