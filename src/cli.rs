use clap::Parser;
use std::path::PathBuf;

use crate::config::ParamOverrides;

/// Watch a screen region and save a snapshot whenever it changes.
#[derive(Debug, Parser)]
#[command(name = "region-watch", version)]
pub struct Args {
    /// Reuse the last region and settings instead of selecting a new region
    #[arg(short, long)]
    pub continuous: bool,
    /// Directory to save snapshots into
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
    /// Fraction of changed pixels (0 to 1) that triggers a snapshot
    #[arg(short, long)]
    pub threshold: Option<f64>,
    /// File name prefix for snapshots
    #[arg(short, long)]
    pub prefix: Option<String>,
    /// Seconds between samples
    #[arg(short, long)]
    pub interval: Option<f64>,
    /// Show the region preview before starting in continuous mode
    #[arg(long)]
    pub confirm_area: bool,
    /// Start without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
    /// Path of the saved session file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> ParamOverrides {
        ParamOverrides {
            threshold: self.threshold,
            interval: self.interval,
            prefix: self.prefix.clone(),
            directory: self.dir.clone(),
        }
    }
}
