#![forbid(unsafe_code)]

//! Playback configuration as data.
//!
//! Captures every pacing, speed, and race constant as a single
//! [`PlaybackConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # sortviz.toml
//! [pacing]
//! base_ms_at_n50 = 8000
//! max_steps_per_tick = 4000
//!
//! [speed]
//! default_percent = 150
//! ```
//!
//! ```rust,ignore
//! let config = PlaybackConfig::from_toml_file("sortviz.toml")?;
//! let config = PlaybackConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `PlaybackConfig::default()` reproduces the reference pacing: a 10 s run at
//! n = 50, clamped to 2..15 s, 20 ms frames at 100 % speed, a 0.6 → 1.4
//! ease-in rate, at most 5000 rounds per tick, and a 25 ms race tie window.
//!
//! Consumers clamp every value they read, so even a config that fails
//! [`PlaybackConfig::validate`] keeps playback well-defined.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use web_time::Duration;

// ---------------------------------------------------------------------------
// Top-level PlaybackConfig
// ---------------------------------------------------------------------------

/// Top-level playback configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PlaybackConfig {
    /// Ease-in pacing parameters.
    pub pacing: PacingConfig,

    /// Speed-to-interval mapping.
    pub speed: SpeedConfig,

    /// Race winner decision parameters.
    pub race: RaceConfig,
}

impl PlaybackConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a file, picking the format from its extension (`.json` is JSON,
    /// anything else is TOML), and reject configs that fail validation.
    #[cfg(feature = "config")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        config.validated()
    }

    /// Return `self` if it validates, otherwise the collected errors.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let p = &self.pacing;

        if p.base_ms_at_n50 == 0 {
            errors.push("pacing.base_ms_at_n50 must be > 0".into());
        }
        if p.min_duration_ms > p.max_duration_ms {
            errors.push(format!(
                "pacing.min_duration_ms must be <= pacing.max_duration_ms, got {} > {}",
                p.min_duration_ms, p.max_duration_ms
            ));
        }
        if p.frame_delay_ms == 0 {
            errors.push("pacing.frame_delay_ms must be > 0".into());
        }
        if p.max_steps_per_tick == 0 {
            errors.push("pacing.max_steps_per_tick must be > 0".into());
        }
        if !(p.rate_start.is_finite() && p.rate_start > 0.0) {
            errors.push(format!(
                "pacing.rate_start must be finite and > 0, got {}",
                p.rate_start
            ));
        }
        if !(p.rate_end.is_finite() && p.rate_end > 0.0) {
            errors.push(format!(
                "pacing.rate_end must be finite and > 0, got {}",
                p.rate_end
            ));
        }

        let s = &self.speed;
        if s.default_percent == 0 {
            errors.push("speed.default_percent must be > 0".into());
        }
        if s.min_delay_ms == 0 {
            errors.push("speed.min_delay_ms must be > 0".into());
        }
        if s.min_delay_ms > s.max_delay_ms {
            errors.push(format!(
                "speed.min_delay_ms must be <= speed.max_delay_ms, got {} > {}",
                s.min_delay_ms, s.max_delay_ms
            ));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Ease-in pacing parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PacingConfig {
    /// Target run duration for an input of 50 elements.
    pub base_ms_at_n50: u64,
    /// Lower clamp on the target duration.
    pub min_duration_ms: u64,
    /// Upper clamp on the target duration.
    pub max_duration_ms: u64,
    /// Tick interval at 100 % speed.
    pub frame_delay_ms: u64,
    /// Upper bound on synchronized rounds consumed in one tick.
    pub max_steps_per_tick: usize,
    /// Rate multiplier at the start of a run.
    pub rate_start: f64,
    /// Rate multiplier once the target tick count is reached.
    pub rate_end: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_ms_at_n50: 10_000,
            min_duration_ms: 2_000,
            max_duration_ms: 15_000,
            frame_delay_ms: 20,
            max_steps_per_tick: 5_000,
            rate_start: 0.6,
            rate_end: 1.4,
        }
    }
}

/// Speed percentage to tick interval mapping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SpeedConfig {
    /// Speed used when the caller does not pick one.
    pub default_percent: u32,
    /// Shortest allowed tick interval.
    pub min_delay_ms: u64,
    /// Longest allowed tick interval.
    pub max_delay_ms: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            default_percent: 100,
            min_delay_ms: 1,
            max_delay_ms: 200,
        }
    }
}

/// Race winner decision parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RaceConfig {
    /// Finish-time differences at or below this are ties.
    pub tie_threshold_ms: u64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            tie_threshold_ms: 25,
        }
    }
}

impl RaceConfig {
    /// Tie window as a duration.
    #[must_use]
    pub fn tie_threshold(&self) -> Duration {
        Duration::from_millis(self.tie_threshold_ms)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a playback configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
