//! Change detection domain — public API.
//!
//! Owns frame comparison and the monitoring loop. The loop never talks
//! to the screen or the filesystem directly: it pulls captures from a
//! `FrameSource` and pushes triggered snapshots into a `SnapshotSink`.

mod frame;
mod watcher;

pub use frame::{exceeds_threshold, Frame, FrameError, CHANGE_DELTA};
pub use watcher::{ChangeWatcher, DetectError, SessionStats, TickOutcome, WatchState};

use crate::capture::CaptureError;
use crate::snapshot::SnapshotError;
use image::RgbaImage;
use std::path::PathBuf;

/// Produces one full-resolution capture of the watched region per call.
pub trait FrameSource {
    fn grab(&mut self) -> Result<RgbaImage, CaptureError>;
}

/// Persists a triggered capture and reports where it went.
pub trait SnapshotSink {
    fn save(&mut self, image: &RgbaImage) -> Result<PathBuf, SnapshotError>;
}
