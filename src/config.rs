//! Trace configuration, loadable from JSON.

use crate::participant::DEFAULT_POLL_INTERVAL;
use crate::types::ClockKind;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Shape of a trace: how many participants, which clock, and how often idle
/// receive loops wake up to check for a stop request.
pub struct TraceConfig {
    pub participants: usize,
    pub clock: ClockKind,
    pub poll_interval_ms: u64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            participants: 3,
            clock: ClockKind::Vector,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl TraceConfig {
    pub fn new(participants: usize, clock: ClockKind) -> Self {
        TraceConfig { participants, clock, ..TraceConfig::default() }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: TraceConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.participants == 0 {
            return Err(ConfigError::Invalid("participants must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        Ok(())
    }
}
