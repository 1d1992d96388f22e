//! Core configuration with TOML file support.

use cohort_types::CohortParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::logging::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(String),
}

/// Configuration for the cohort core.
///
/// Can be loaded from a TOML file via [`CohortConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Public base URL used when building links in outgoing emails.
    #[serde(default = "default_host")]
    pub host: String,

    /// Seconds that must pass before another token is sent to the same identity.
    #[serde(default = "default_cooldown")]
    pub token_resend_cooldown_secs: u64,

    /// Seconds that must pass between recruiting toggles on a group.
    #[serde(default = "default_cooldown")]
    pub recruiting_cooldown_secs: u64,

    /// Maximum group title length in characters.
    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_host() -> String {
    "http://localhost:8080".to_string()
}

fn default_cooldown() -> u64 {
    CohortParams::ONE_HOUR_SECS
}

fn default_max_title_len() -> usize {
    CohortParams::cohort_defaults().max_title_len
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CohortConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Policy values handed to the services.
    pub fn params(&self) -> CohortParams {
        CohortParams {
            token_resend_cooldown_secs: self.token_resend_cooldown_secs,
            recruiting_cooldown_secs: self.recruiting_cooldown_secs,
            max_title_len: self.max_title_len,
        }
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format)
    }
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            token_resend_cooldown_secs: default_cooldown(),
            recruiting_cooldown_secs: default_cooldown(),
            max_title_len: default_max_title_len(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
