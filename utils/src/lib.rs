//! Shared utilities for the cohort core: configuration, logging setup and
//! duration formatting.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{CohortConfig, ConfigError};
pub use logging::{init_logging, LogFormat};
pub use time::format_duration;
