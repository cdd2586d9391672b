//! Transcript recording of a sequence run.
//!
//! The transcript uses an asciicast-v2-like layout so runs can be inspected
//! or replayed line by line:
//! 1. A header line (JSON object with metadata)
//! 2. Event lines (JSON arrays with `[time, code, data]`)
//!
//! Event codes: `p` phase change, `o` line output, `w` window mount/unmount,
//! `i` interaction result, `r` redirect.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use bootseq_core::{Dimensions, Result, SequenceEvent};

/// Transcript header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptHeader {
    /// Format version (always 2)
    pub version: u8,
    /// Display width
    pub width: u16,
    /// Display height
    pub height: u16,
    /// Unix timestamp of recording start
    pub timestamp: Option<i64>,
    /// Optional title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A single transcript event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEvent {
    /// Time offset from start in seconds
    pub time: f64,
    /// Event code
    pub code: String,
    /// Event payload
    pub data: String,
}

/// Records sequence events with time offsets.
///
/// # Example
///
/// ```
/// use bootseq_core::{Dimensions, Line, SequenceEvent, WindowId};
/// use bootseq_display::SequenceRecorder;
///
/// let mut recorder = SequenceRecorder::new(Dimensions::new(40, 140));
/// recorder.record(&SequenceEvent::LineAppended {
///     window: WindowId::new(),
///     line: Line::plain("[SYSTEM] Initializing..."),
/// });
///
/// let transcript = recorder.to_string().unwrap();
/// assert!(transcript.contains("Initializing"));
/// ```
#[derive(Debug)]
pub struct SequenceRecorder {
    events: Vec<RecordEvent>,
    start_time: Instant,
    started_at: DateTime<Utc>,
    dimensions: Dimensions,
    title: Option<String>,
}

impl SequenceRecorder {
    /// Create a new recorder.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            events: Vec::new(),
            start_time: Instant::now(),
            started_at: Utc::now(),
            dimensions,
            title: None,
        }
    }

    /// Create a new recorder with a title.
    pub fn with_title(dimensions: Dimensions, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new(dimensions)
        }
    }

    /// Record a sequence event.
    pub fn record(&mut self, event: &SequenceEvent) {
        let (code, data) = match event {
            SequenceEvent::PhaseChanged { from, to, .. } => ("p", format!("{from}->{to}")),
            SequenceEvent::LineAppended { line, .. } => ("o", format!("{}\r\n", line.text)),
            SequenceEvent::WindowMounted { title, placement, .. } => {
                ("w", format!("+{title}@{}", placement.position))
            }
            SequenceEvent::WindowUnmounted { window } => ("w", format!("-{window}")),
            SequenceEvent::InteractionResolved {
                observed,
                waited_ms,
            } => {
                let outcome = if *observed { "input" } else { "timeout" };
                ("i", format!("{outcome} after {waited_ms}ms"))
            }
            SequenceEvent::Redirected { destination, .. } => ("r", destination.clone()),
        };
        self.push(code, data);
    }

    fn push(&mut self, code: &str, data: String) {
        self.events.push(RecordEvent {
            time: self.start_time.elapsed().as_secs_f64(),
            code: code.to_string(),
            data,
        });
    }

    /// Recorded events.
    pub fn events(&self) -> &[RecordEvent] {
        &self.events
    }

    /// Get the number of recorded events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Events with a given code.
    pub fn events_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a RecordEvent> {
        self.events.iter().filter(move |e| e.code == code)
    }

    /// Get the duration of the recording in seconds.
    pub fn duration(&self) -> f64 {
        self.events.last().map(|e| e.time).unwrap_or(0.0)
    }

    fn header(&self) -> TranscriptHeader {
        TranscriptHeader {
            version: 2,
            width: self.dimensions.cols,
            height: self.dimensions.rows,
            timestamp: Some(self.started_at.timestamp()),
            title: self.title.clone(),
        }
    }

    /// Save the transcript to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        self.save_to_writer(&mut file)
    }

    /// Save the transcript to a writer.
    pub fn save_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let header = self.header();
        serde_json::to_writer(&mut *writer, &header)?;
        writeln!(writer)?;

        for event in &self.events {
            let event_array = serde_json::json!([event.time, event.code, event.data]);
            serde_json::to_writer(&mut *writer, &event_array)?;
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Convert the transcript to a string.
    pub fn to_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.save_to_writer(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    /// Load a transcript from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        content.parse().map_err(Into::into)
    }
}

impl FromStr for SequenceRecorder {
    type Err = io::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let mut lines = content.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Empty transcript"))?;
        let header: TranscriptHeader = serde_json::from_str(header_line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut events = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let (time, code, data): (f64, String, String) = serde_json::from_str(line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            events.push(RecordEvent { time, code, data });
        }

        Ok(Self {
            events,
            start_time: Instant::now(),
            started_at: header
                .timestamp
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
                .unwrap_or_else(Utc::now),
            dimensions: Dimensions::new(header.height, header.width),
            title: header.title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootseq_core::{Line, Phase, Placement, Position, RunId, WindowId, WindowRole};

    fn phase_event(from: Phase, to: Phase) -> SequenceEvent {
        SequenceEvent::PhaseChanged {
            run: Some(RunId::new()),
            from,
            to,
        }
    }

    #[test]
    fn test_recorder_creation() {
        let recorder = SequenceRecorder::new(Dimensions::new(40, 140));
        assert_eq!(recorder.event_count(), 0);
        assert_eq!(recorder.duration(), 0.0);
    }

    #[test]
    fn test_record_phase_and_line() {
        let mut recorder = SequenceRecorder::new(Dimensions::new(40, 140));
        recorder.record(&phase_event(Phase::Idle, Phase::Booting));
        recorder.record(&SequenceEvent::LineAppended {
            window: WindowId::new(),
            line: Line::plain("[SYSTEM] Loading kernel modules..."),
        });

        assert_eq!(recorder.event_count(), 2);
        assert_eq!(recorder.events()[0].code, "p");
        assert_eq!(recorder.events()[0].data, "idle->booting");
        assert_eq!(recorder.events()[1].code, "o");
        assert_eq!(
            recorder.events()[1].data,
            "[SYSTEM] Loading kernel modules...\r\n"
        );
    }

    #[test]
    fn test_record_window_interaction_redirect() {
        let mut recorder = SequenceRecorder::new(Dimensions::new(40, 140));
        recorder.record(&SequenceEvent::WindowMounted {
            window: WindowId::new(),
            title: "Network Scanner".to_string(),
            role: WindowRole::Explosion,
            placement: Placement::new(Position::new(10, 4), 1, 15),
        });
        recorder.record(&SequenceEvent::InteractionResolved {
            observed: false,
            waited_ms: 5000,
        });
        recorder.record(&SequenceEvent::Redirected {
            run: RunId::new(),
            destination: "/home".to_string(),
        });

        assert_eq!(recorder.events()[0].data, "+Network Scanner@(10, 4)");
        assert_eq!(recorder.events()[1].data, "timeout after 5000ms");
        assert_eq!(recorder.events_with_code("r").count(), 1);
    }

    #[test]
    fn test_save_to_writer() {
        let mut recorder = SequenceRecorder::with_title(Dimensions::new(40, 140), "boot");
        recorder.record(&phase_event(Phase::Idle, Phase::Booting));

        let mut buffer = Vec::new();
        recorder.save_to_writer(&mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\"version\":2"));
        assert!(output.contains("\"width\":140"));
        assert!(output.contains("\"height\":40"));
        assert!(output.contains("\"title\":\"boot\""));
        assert!(output.contains("idle->booting"));
    }

    #[test]
    fn test_load_from_string() {
        let mut recorder = SequenceRecorder::new(Dimensions::new(24, 80));
        recorder.record(&phase_event(Phase::Idle, Phase::Booting));
        recorder.record(&SequenceEvent::LineAppended {
            window: WindowId::new(),
            line: Line::plain("hello"),
        });

        let serialized = recorder.to_string().unwrap();
        let loaded = SequenceRecorder::from_str(&serialized).unwrap();

        assert_eq!(loaded.event_count(), 2);
        assert_eq!(loaded.dimensions, Dimensions::new(24, 80));
        assert_eq!(loaded.events()[1].code, "o");
        assert_eq!(loaded.events()[1].data, "hello\r\n");
        assert_eq!(loaded.started_at.timestamp(), recorder.started_at.timestamp());
    }

    #[test]
    fn test_load_empty_transcript() {
        assert!(SequenceRecorder::from_str("").is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        assert!(SequenceRecorder::from_str("invalid json").is_err());
    }
}
