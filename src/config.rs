//! Process configuration.
//!
//! Configuration is read from a TOML file whose path comes from the caller,
//! the `WELDTRACK_CONFIG` environment variable, or `weldtrack.toml` in the
//! working directory, in that order. A missing default file yields the
//! built-in defaults; a missing explicit file is an error.
//! `WELDTRACK_DATABASE_URL` overrides the database URL from any source.

use crate::certificate::domain::DEFAULT_EXPIRING_WINDOW_DAYS;
use crate::retry::{RetryPolicy, RetryStrategy};
use crate::weld_job::services::DEFAULT_ALLOCATION_ATTEMPTS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "WELDTRACK_CONFIG";

/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV_VAR: &str = "WELDTRACK_DATABASE_URL";

/// Configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "weldtrack.toml";

/// Errors returned while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The file is not valid TOML for this configuration.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeldtrackConfig {
    /// Record store connection.
    pub database: DatabaseConfig,
    /// Business identifier allocation.
    pub allocation: AllocationConfig,
    /// Document recognition and extraction calls.
    pub extraction: ExtractionConfig,
    /// Certificate expiry alerts.
    pub certificates: CertificateConfig,
    /// Calibration due-date alerts.
    pub calibration: CalibrationConfig,
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/weldtrack".to_owned(),
        }
    }
}

/// `[allocation]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationConfig {
    /// Candidates tried before allocation gives up.
    pub max_attempts: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_ALLOCATION_ATTEMPTS,
        }
    }
}

/// `[extraction]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Attempts per collaborator call.
    pub max_attempts: u32,
    /// Timeout of a single attempt, in seconds.
    pub timeout_secs: u64,
    /// Delay between attempts, in milliseconds.
    pub backoff_ms: u64,
    /// Backoff growth.
    pub strategy: RetryStrategy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_secs: 120,
            backoff_ms: 1000,
            strategy: RetryStrategy::Fixed,
        }
    }
}

impl ExtractionConfig {
    /// Builds the retry policy described by this section.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.timeout_secs),
            Duration::from_millis(self.backoff_ms),
        )
        .with_strategy(self.strategy)
    }
}

/// `[certificates]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CertificateConfig {
    /// Days before expiry at which a certificate is flagged.
    pub expiring_window_days: u32,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            expiring_window_days: DEFAULT_EXPIRING_WINDOW_DAYS,
        }
    }
}

/// `[calibration]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalibrationConfig {
    /// Days before the due date at which an instrument is flagged.
    pub due_window_days: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            due_window_days: DEFAULT_EXPIRING_WINDOW_DAYS,
        }
    }
}

impl WeldtrackConfig {
    /// Loads, overrides and validates configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit file is missing or
    /// unreadable, the file does not parse, or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        let mut config = match explicit {
            Some(resolved) => Self::read(&resolved)?,
            None => match Self::read(Path::new(DEFAULT_CONFIG_FILE)) {
                Err(ConfigError::Io(_)) if !Path::new(DEFAULT_CONFIG_FILE).exists() => {
                    Self::default()
                }
                other => other?,
            },
        };
        config.apply_overrides(env::var(DATABASE_URL_ENV_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed input or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err: io::Error| {
            ConfigError::Io(format!("{}: {err}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Replaces the database URL when an override is present and non-blank.
    pub fn apply_overrides(&mut self, database_url: Option<String>) {
        if let Some(url) = database_url.filter(|value| !value.trim().is_empty()) {
            self.database.url = url;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for empty URLs, zero attempt
    /// budgets, zero timeouts or a zero alert window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".to_owned()));
        }
        if self.allocation.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "allocation.max_attempts must be at least 1".to_owned(),
            ));
        }
        if self.extraction.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "extraction.max_attempts must be at least 1".to_owned(),
            ));
        }
        if self.extraction.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "extraction.timeout_secs must be at least 1".to_owned(),
            ));
        }
        if self.certificates.expiring_window_days == 0 {
            return Err(ConfigError::Invalid(
                "certificates.expiring_window_days must be at least 1".to_owned(),
            ));
        }
        if self.calibration.due_window_days == 0 {
            return Err(ConfigError::Invalid(
                "calibration.due_window_days must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
