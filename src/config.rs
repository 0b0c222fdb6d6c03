use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::level::Severity;
use crate::sink::Target;

/// Environment variable overriding the minimum level
pub const LEVEL_ENV: &str = "TIMBERLOG_LEVEL";

/// Environment variable overriding the log file; empty means standard output
pub const FILE_ENV: &str = "TIMBERLOG_FILE";

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// File to append to (None = standard output)
    pub log_file: Option<PathBuf>,

    /// Minimum severity that gets written
    pub log_level: Severity,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            log_file: None,
            log_level: Severity::Info,
        }
    }
}

impl LoggerConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `TIMBERLOG_LEVEL` and `TIMBERLOG_FILE` overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(env::var(LEVEL_ENV).ok(), env::var_os(FILE_ENV).map(PathBuf::from))
    }

    fn apply_overrides(&mut self, level: Option<String>, file: Option<PathBuf>) -> Result<()> {
        if let Some(level) = level {
            self.log_level = level.parse()?;
        }

        if let Some(file) = file {
            self.log_file = if file.as_os_str().is_empty() { None } else { Some(file) };
        }

        Ok(())
    }

    /// The sink target this configuration names
    pub fn target(&self) -> Target {
        match &self.log_file {
            Some(path) => Target::File(path.clone()),
            None => Target::Stdout,
        }
    }
}
