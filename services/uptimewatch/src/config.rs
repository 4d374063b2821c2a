//! Configuration types for the uptimewatch service

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the status endpoint, e.g. "http://localhost:8710"
    #[serde(default = "default_url")]
    pub url: String,

    /// Steady polling cadence in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// Display language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Optional translations catalog (JSON keyed by language code)
    #[serde(default)]
    pub translations: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            poll_interval_seconds: default_poll_interval(),
            language: default_language(),
            translations: None,
        }
    }
}

impl Config {
    /// Full URL of the status endpoint
    pub fn status_url(&self) -> String {
        format!("{}/status", self.url.trim_end_matches('/'))
    }
}

fn default_url() -> String {
    "http://localhost:8710".to_string()
}

fn default_poll_interval() -> u64 {
    10
}

fn default_language() -> String {
    "en".to_string()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    if config.poll_interval_seconds == 0 {
        return Err(crate::WatchError::Config(
            "poll_interval_seconds must be at least 1".to_string(),
        ));
    }
    Ok(config)
}
