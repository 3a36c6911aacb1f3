//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/segments",
//!   "sync_on_close": true,
//!   "log_level": "INFO"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::fs::FsHandler;
use crate::observability::Severity;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory segment stems are resolved against (required)
    pub data_dir: String,

    /// fsync each deleted-docs file before reporting the write done
    #[serde(default = "default_sync_on_close")]
    pub sync_on_close: bool,

    /// Minimum log severity (TRACE, INFO, WARN, ERROR, FATAL)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sync_on_close() -> bool {
    true
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        self.min_severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn min_severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    /// Local streams rooted at `data_dir`
    pub fn fs_handler(&self) -> FsHandler {
        FsHandler::local(&self.data_dir, self.sync_on_close)
    }
}
