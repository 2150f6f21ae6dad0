//! Persisted session record and startup parameters.
//!
//! The record lives in the platform-appropriate config directory:
//!   macOS:   ~/Library/Application Support/region-watch/config.json
//!   Linux:   ~/.config/region-watch/config.json
//!   Windows: %APPDATA%/region-watch/config.json

mod session;

pub use session::{
    next_session_directory, ParamError, ParamOverrides, SessionParams, DEFAULT_INTERVAL_SECS,
    DEFAULT_PREFIX, DEFAULT_THRESHOLD,
};

use crate::capture::Rectangle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base directory for region-watch state.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("region-watch")
}

/// Default location of the persisted session record.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// The last confirmed session: region plus parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedConfig {
    pub monitor_area: Rectangle,
    pub change_threshold: f64,
    pub prefix: String,
    pub interval: f64,
    pub last_directory: PathBuf,
}

impl PersistedConfig {
    pub fn from_session(area: Rectangle, params: &SessionParams) -> Self {
        Self {
            monitor_area: area,
            change_threshold: params.threshold(),
            prefix: params.prefix().to_string(),
            interval: params.interval_secs(),
            last_directory: params.directory().to_path_buf(),
        }
    }

    /// Reads the record at `path`.
    ///
    /// A missing or unparsable file is not an error: it just means there is
    /// no previous session to continue.
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("[CONFIG] No saved session at {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => {
                log::debug!("[CONFIG] Loaded saved session from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::debug!("[CONFIG] Ignoring unreadable {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Writes the record to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::info!("[CONFIG] Session saved to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
