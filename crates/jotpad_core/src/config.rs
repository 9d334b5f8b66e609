//! Runtime configuration for the note store.
//!
//! Values come from environment variables or any serde source; every field
//! has a default so an empty config yields an in-memory store without file
//! logging.

use crate::logging::{default_log_level, LoggingConfig};
use serde::Deserialize;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "JOTPAD_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "JOTPAD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "JOTPAD_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Database file; `None` keeps notes in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Builds a config from `JOTPAD_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            db_path: non_blank(ENV_DB_PATH).map(PathBuf::from),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Logging settings, when file logging is configured.
    pub fn logging(&self) -> Option<LoggingConfig> {
        self.log_dir.as_ref().map(|dir| LoggingConfig {
            level: self.log_level.clone(),
            log_dir: dir.clone(),
        })
    }
}
