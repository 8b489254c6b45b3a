// Configuration management (<config dir>/steptracker/config.ron)

use crate::sequencer::dispatch::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use crate::sequencer::player::DEFAULT_BPM;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.ron";
const APP_DIR: &str = "steptracker";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Parse { path: String, message: String },
}

/// Tracker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_bpm")]
    pub default_bpm: u32,
    #[serde(default = "default_workers")]
    pub dispatch_workers: usize,
    #[serde(default = "default_queue")]
    pub dispatch_queue: usize,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// Sample bank bound to every event when set
    #[serde(default)]
    pub sample_bank: Option<PathBuf>,
}

fn default_bpm() -> u32 {
    DEFAULT_BPM
}
fn default_workers() -> usize {
    DEFAULT_WORKERS
}
fn default_queue() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
fn default_log_file() -> PathBuf {
    PathBuf::from("steptracker.log")
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_bpm: default_bpm(),
            dispatch_workers: default_workers(),
            dispatch_queue: default_queue(),
            log_file: default_log_file(),
            sample_bank: None,
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

impl TrackerConfig {
    /// Parse a RON document
    pub fn from_ron(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load an explicit config file; it must exist and parse
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_ron(&content, path)
    }

    /// Load `explicit` if given, else the default file; a missing default file yields defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }
}
