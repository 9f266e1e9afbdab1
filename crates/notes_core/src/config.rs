//! Runtime configuration for the note core.
//!
//! # Responsibility
//! - Collect logging and deadline-monitor settings in one value.
//! - Read overrides from `NOTES_*` environment variables.
//!
//! # Invariants
//! - A loaded config always has a supported log level, an absolute log
//!   directory (when set) and a non-zero deadline interval.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_LOG_LEVEL: &str = "NOTES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTES_LOG_DIR";
pub const ENV_DEADLINE_INTERVAL_SECS: &str = "NOTES_DEADLINE_INTERVAL_SECS";

/// Default cadence of the background deadline sweep.
pub const DEFAULT_DEADLINE_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidLogDir(String),
    InvalidDeadlineInterval(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(details) | Self::InvalidLogDir(details) => {
                write!(f, "{details}")
            }
            Self::InvalidDeadlineInterval(value) => write!(
                f,
                "{ENV_DEADLINE_INTERVAL_SECS} must be a positive integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub deadline_check_interval: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            deadline_check_interval: DEFAULT_DEADLINE_CHECK_INTERVAL,
        }
    }
}

impl CoreConfig {
    /// Loads defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads defaults overridden by `lookup(key)` values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(ConfigError::InvalidLogDir)?);
        }
        if let Some(secs) = lookup(ENV_DEADLINE_INTERVAL_SECS) {
            config.deadline_check_interval = parse_interval_secs(&secs)?;
        }

        Ok(config)
    }
}

fn parse_interval_secs(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidDeadlineInterval(value.to_string())),
    }
}
