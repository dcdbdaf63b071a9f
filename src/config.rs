//! CLI configuration loaded from `~/.config/rclint/config.toml`.
//!
//! All fields are optional; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolve::{Diagnostic, ErrorKind, Severity};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config validation failed: {message}")]
    ValidationError { message: String },
}

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub defaults: Defaults,
    pub severity: SeverityConfig,
}

/// Default settings for ad-hoc flag checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Command scope used by `--flag` checks when `--command` is absent.
    pub command: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            command: "build".to_string(),
        }
    }
}

/// How advisory findings are reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    pub deprecated: SeverityChoice,
    pub experimental: SeverityChoice,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            deprecated: SeverityChoice::Warning,
            experimental: SeverityChoice::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityChoice {
    Ignore,
    Warning,
    Error,
}

impl LintConfig {
    /// `~/.config/rclint/config.toml` (or the platform equivalent); falls
    /// back to the current directory if no config dir is available.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("rclint").join("config.toml")
    }

    /// Load from the default location; a missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path (the file must exist).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: LintConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.command.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "defaults.command must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Apply severity overrides to a diagnostic. Returns `None` when the
    /// finding is configured to be ignored.
    pub fn adjust(&self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        let choice = match diagnostic.kind {
            ErrorKind::DeprecatedFlag { .. } => self.severity.deprecated,
            ErrorKind::ExperimentalFlag { .. } => self.severity.experimental,
            _ => return Some(diagnostic),
        };
        match choice {
            SeverityChoice::Ignore => None,
            SeverityChoice::Warning => Some(Diagnostic {
                severity: Severity::Warning,
                ..diagnostic
            }),
            SeverityChoice::Error => Some(Diagnostic {
                severity: Severity::Error,
                ..diagnostic
            }),
        }
    }
}
