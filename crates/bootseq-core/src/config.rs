//! Configuration types for the boot sequence.
//!
//! Every timing constant, the explosion window count, the allocator retry
//! budget and the storm alphabet live here so they can be tuned from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{Dimensions, Error, LineKind};

/// Longest configurable delay (one hour).
pub const MAX_DELAY_MS: u64 = 3_600_000;

/// Sequence configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SequenceConfig {
    /// Delays and typing speeds
    pub timing: TimingSettings,
    /// Explosion window settings
    pub explosion: ExplosionSettings,
    /// Glyph storm settings
    pub storm: StormSettings,
    /// Display settings
    pub display: DisplaySettings,
    /// Text content
    pub content: ContentSettings,
    /// Redirect settings
    pub redirect: RedirectSettings,
    /// Seed for reproducible runs (random when absent)
    pub seed: Option<u64>,
}

impl SequenceConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: SequenceConfig = serde_yaml::from_str(yaml)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.display.rows == 0 || self.display.cols == 0 {
            return Err(Error::InvalidDimensions {
                rows: self.display.rows,
                cols: self.display.cols,
            });
        }

        let explosion = &self.explosion;
        if explosion.window_count == 0 {
            return Err(Error::Config(
                "explosion.window_count must be > 0".to_string(),
            ));
        }
        if explosion.max_placement_attempts == 0 {
            return Err(Error::Config(
                "explosion.max_placement_attempts must be > 0".to_string(),
            ));
        }
        if explosion.window_width < 3 || explosion.window_height < 3 {
            return Err(Error::InvalidDimensions {
                rows: explosion.window_height,
                cols: explosion.window_width,
            });
        }
        if explosion.window_width > self.display.cols || explosion.window_height > self.display.rows
        {
            return Err(Error::Config(format!(
                "explosion window {}x{} does not fit display {}x{}",
                explosion.window_height,
                explosion.window_width,
                self.display.rows,
                self.display.cols
            )));
        }
        if explosion.grid_step_x == 0 || explosion.grid_step_y == 0 {
            return Err(Error::Config(
                "explosion grid steps must be > 0".to_string(),
            ));
        }

        if self.storm.alphabet.chars().all(char::is_whitespace) {
            return Err(Error::Config("storm.alphabet cannot be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.storm.phrase_chance) {
            return Err(Error::Config(format!(
                "storm.phrase_chance must be within 0..=1, got {}",
                self.storm.phrase_chance
            )));
        }

        let timing = &self.timing;
        let delays = [
            ("timing.boot_typing.base_ms", timing.boot_typing.base_ms),
            ("timing.boot_typing.jitter_ms", timing.boot_typing.jitter_ms),
            ("timing.target_typing.base_ms", timing.target_typing.base_ms),
            ("timing.target_typing.jitter_ms", timing.target_typing.jitter_ms),
            ("timing.interaction_timeout_ms", timing.interaction_timeout_ms),
            ("timing.access_pause_ms", timing.access_pause_ms),
            ("timing.settle_delay_ms", timing.settle_delay_ms),
            ("explosion.spawn_stagger_ms", explosion.spawn_stagger_ms),
            ("storm.tick_ms", self.storm.tick_ms),
            ("display.frame_interval_ms", self.display.frame_interval_ms),
        ];
        let step_delays = self
            .content
            .boot_steps
            .iter()
            .map(|step| ("content.boot_steps.delay_ms", step.delay_ms));
        for (name, value) in delays.into_iter().chain(step_delays) {
            if value > MAX_DELAY_MS {
                return Err(Error::Config(format!(
                    "{name} must be at most {MAX_DELAY_MS}ms, got {value}"
                )));
            }
        }

        if self.redirect.destination.trim().is_empty() {
            return Err(Error::Config(
                "redirect.destination cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Display dimensions.
    pub fn display_dimensions(&self) -> Dimensions {
        Dimensions::new(self.display.rows, self.display.cols)
    }

    /// Explosion window size.
    pub fn explosion_window_size(&self) -> Dimensions {
        Dimensions::new(self.explosion.window_height, self.explosion.window_width)
    }
}

/// Typing speed: each keystroke waits `base_ms` plus up to `jitter_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingSpeed {
    /// Minimum delay per character
    pub base_ms: u64,
    /// Random extra delay per character (exclusive upper bound)
    pub jitter_ms: u64,
}

impl TypingSpeed {
    /// Create a typing speed.
    pub fn new(base_ms: u64, jitter_ms: u64) -> Self {
        Self { base_ms, jitter_ms }
    }

    /// Base delay as a duration.
    pub fn base(&self) -> Duration {
        Duration::from_millis(self.base_ms)
    }
}

/// Timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Typing speed of boot log lines
    pub boot_typing: TypingSpeed,
    /// Typing speed of the target file name
    pub target_typing: TypingSpeed,
    /// Maximum wait for user input before auto-advancing
    pub interaction_timeout_ms: u64,
    /// Pause between the access lines of the explosion preamble
    pub access_pause_ms: u64,
    /// Delay between the redirect notice and navigation
    pub settle_delay_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            boot_typing: TypingSpeed::new(12, 18),
            target_typing: TypingSpeed::new(50, 100),
            interaction_timeout_ms: 5000,
            access_pause_ms: 500,
            settle_delay_ms: 1000,
        }
    }
}

impl TimingSettings {
    /// Interaction timeout as a duration.
    pub fn interaction_timeout(&self) -> Duration {
        Duration::from_millis(self.interaction_timeout_ms)
    }

    /// Access pause as a duration.
    pub fn access_pause(&self) -> Duration {
        Duration::from_millis(self.access_pause_ms)
    }

    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Explosion window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionSettings {
    /// Number of explosion windows spawned per run
    pub window_count: usize,
    /// Delay between consecutive window spawns
    pub spawn_stagger_ms: u64,
    /// Random placement attempts before the deterministic fallback
    pub max_placement_attempts: usize,
    /// Explosion window width in columns
    pub window_width: u16,
    /// Explosion window height in rows
    pub window_height: u16,
    /// Horizontal spacing of candidate anchors
    pub grid_step_x: u16,
    /// Vertical spacing of candidate anchors
    pub grid_step_y: u16,
}

impl Default for ExplosionSettings {
    fn default() -> Self {
        Self {
            window_count: 8,
            spawn_stagger_ms: 300,
            max_placement_attempts: 20,
            window_width: 44,
            window_height: 10,
            grid_step_x: 10,
            grid_step_y: 4,
        }
    }
}

impl ExplosionSettings {
    /// Spawn stagger as a duration.
    pub fn spawn_stagger(&self) -> Duration {
        Duration::from_millis(self.spawn_stagger_ms)
    }
}

/// Glyph storm settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StormSettings {
    /// Lines appended per window
    pub ticks: usize,
    /// Interval between lines
    pub tick_ms: u64,
    /// Width of glyph lines in characters
    pub line_width: usize,
    /// Characters glyph lines are drawn from
    pub alphabet: String,
    /// Probability that a tick emits a themed phrase instead of glyphs
    pub phrase_chance: f64,
}

impl Default for StormSettings {
    fn default() -> Self {
        Self {
            ticks: 50,
            tick_ms: 80,
            line_width: 40,
            alphabet: "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉ0123456789@#$%&*+=<>".to_string(),
            phrase_chance: 0.35,
        }
    }
}

impl StormSettings {
    /// Tick interval as a duration.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Screen rows
    pub rows: u16,
    /// Screen columns
    pub cols: u16,
    /// Interval between rendered frames
    pub frame_interval_ms: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let dims = Dimensions::default();
        Self {
            rows: dims.rows,
            cols: dims.cols,
            frame_interval_ms: 50,
            log_level: "info".to_string(),
        }
    }
}

/// One line of the boot log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootStep {
    /// Pause before the line starts typing, measured from the end of the
    /// previous line
    pub delay_ms: u64,
    /// Line body
    pub text: String,
    /// Line kind
    pub kind: LineKind,
}

impl BootStep {
    /// Create a boot step.
    pub fn new(delay_ms: u64, text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            delay_ms,
            text: text.into(),
            kind,
        }
    }
}

/// Text content settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// Host name shown in prompts
    pub hostname: String,
    /// OS version string
    pub version: String,
    /// File name typed at the interaction prompt
    pub target_file: String,
    /// Boot log lines
    pub boot_steps: Vec<BootStep>,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            hostname: "xiaoOS".to_string(),
            version: "v2.1".to_string(),
            target_file: "DAVID_XIAO.portfolio".to_string(),
            boot_steps: vec![
                BootStep::new(0, "Initializing xiaoOS v2.1...", LineKind::System),
                BootStep::new(800, "Loading kernel modules...", LineKind::Loading),
                BootStep::new(700, "Mounting surveillance filesystem...", LineKind::System),
                BootStep::new(700, "Starting network protocols...", LineKind::Loading),
                BootStep::new(800, "Activating security subsystems...", LineKind::System),
                BootStep::new(800, "xiaoOS v2.1 ready for operation", LineKind::Success),
                BootStep::new(400, "", LineKind::Prompt),
            ],
        }
    }
}

/// Redirect settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectSettings {
    /// Navigation destination
    pub destination: String,
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self {
            destination: "/home".to_string(),
        }
    }
}
