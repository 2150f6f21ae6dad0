//! Session parameters: defaults, saved values, and command-line overrides
//! merged into one validated, read-only value.

use super::PersistedConfig;
use chrono::{DateTime, Local};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_PREFIX: &str = "screenshot";

/// Base directory used when there is no previous session to follow.
const DEFAULT_BASE_DIR: &str = "snapshots";

static NUMERIC_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub threshold: Option<f64>,
    pub interval: Option<f64>,
    pub prefix: Option<String>,
    pub directory: Option<PathBuf>,
}

/// Validated parameters for one monitoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParams {
    threshold: f64,
    interval_secs: f64,
    interval: Duration,
    directory: PathBuf,
    prefix: String,
}

impl SessionParams {
    pub fn new(
        threshold: f64,
        interval_secs: f64,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Result<Self, ParamError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ParamError::InvalidThreshold(threshold));
        }
        let interval = Duration::try_from_secs_f64(interval_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or(ParamError::InvalidInterval(interval_secs))?;
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(ParamError::InvalidPrefix(prefix));
        }

        Ok(Self {
            threshold,
            interval_secs,
            interval,
            directory: directory.into(),
            prefix,
        })
    }

    /// Merges overrides over the saved session.
    ///
    /// In continuous mode the saved session supplies every value the
    /// command line leaves out, including the destination directory. A
    /// fresh session uses built-in defaults and derives a new directory
    /// from the previous one with [`next_session_directory`].
    pub fn resolve(
        overrides: &ParamOverrides,
        saved: Option<&PersistedConfig>,
        continuous: bool,
        now: DateTime<Local>,
    ) -> Result<Self, ParamError> {
        let carried = if continuous { saved } else { None };

        let threshold = overrides
            .threshold
            .or(carried.map(|c| c.change_threshold))
            .unwrap_or(DEFAULT_THRESHOLD);
        let interval = overrides
            .interval
            .or(carried.map(|c| c.interval))
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        let prefix = overrides
            .prefix
            .clone()
            .or(carried.map(|c| c.prefix.clone()))
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let directory = match (&overrides.directory, carried) {
            (Some(dir), _) => dir.clone(),
            (None, Some(c)) => c.last_directory.clone(),
            (None, None) => {
                next_session_directory(saved.map(|c| c.last_directory.as_path()), now)
            }
        };

        Self::new(threshold, interval, directory, prefix)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl std::fmt::Display for SessionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "threshold {:.1}%, every {}s, saving to {} as {}_*.png",
            self.threshold * 100.0,
            self.interval_secs,
            self.directory.display(),
            self.prefix
        )
    }
}

/// Picks the destination directory for a new session.
///
/// A purely numeric last directory (`runs/007`) is treated as a session
/// counter and incremented, keeping its zero padding (`runs/008`). Any
/// other name gets a timestamped sibling (`runs/20240309_140507`). With no
/// previous directory the session goes under `snapshots/`.
pub fn next_session_directory(last: Option<&Path>, now: DateTime<Local>) -> PathBuf {
    let stamp = now.format("%Y%m%d_%H%M%S").to_string();

    let Some(last) = last else {
        return PathBuf::from(DEFAULT_BASE_DIR).join(stamp);
    };

    let parent = last.parent().unwrap_or_else(|| Path::new(""));
    let name = last
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if NUMERIC_NAME.is_match(&name) {
        if let Some(next) = name.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
            return parent.join(format!("{:0width$}", next, width = name.len()));
        }
    }

    parent.join(stamp)
}

#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("Change threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),

    #[error("Interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),

    #[error("Invalid file prefix '{0}'")]
    InvalidPrefix(String),
}
