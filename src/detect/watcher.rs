//! The change-detection loop: sample, compare, decide, sleep.
//!
//! `ChangeWatcher::tick` runs one synchronous iteration and is what the
//! tests drive directly. `ChangeWatcher::run_until` wraps it in the
//! interval cadence and stops when the shutdown future resolves.

use super::frame::{exceeds_threshold, Frame, FrameError};
use super::{FrameSource, SnapshotSink};
use crate::capture::CaptureError;
use crate::snapshot::SnapshotError;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// No frame captured yet.
    Warmup,
    /// Comparing each new frame with the previous one.
    Steady,
    /// Interrupted or failed. Never left once entered.
    Terminated,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Capture came back empty; previous frame kept.
    Empty,
    /// First frame stored, nothing to compare against yet.
    Primed,
    /// Frame size changed; comparison skipped, new frame adopted.
    Resized {
        previous: (u32, u32),
        current: (u32, u32),
    },
    /// Compared, below threshold.
    Unchanged { change_ratio: f64 },
    /// Compared, above threshold, snapshot written.
    Saved { change_ratio: f64, path: PathBuf },
}

/// Running tally for the end-of-session summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    pub comparisons: u64,
    pub snapshots: u64,
    pub skipped: u64,
}

pub struct ChangeWatcher<S, W> {
    source: S,
    sink: W,
    threshold: f64,
    interval: Duration,
    previous: Option<Frame>,
    state: WatchState,
    stats: SessionStats,
}

impl<S: FrameSource, W: SnapshotSink> ChangeWatcher<S, W> {
    pub fn new(source: S, sink: W, threshold: f64, interval: Duration) -> Self {
        Self {
            source,
            sink,
            threshold,
            interval,
            previous: None,
            state: WatchState::Warmup,
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Dimensions of the stored previous frame, if any.
    pub fn previous_dimensions(&self) -> Option<(u32, u32)> {
        self.previous.as_ref().map(Frame::dimensions)
    }

    /// Runs one capture → compare → decide step.
    ///
    /// Recoverable conditions (empty capture, size change) come back as
    /// outcomes. Anything else terminates the watcher and is returned as
    /// an error.
    pub fn tick(&mut self) -> Result<TickOutcome, DetectError> {
        if self.state == WatchState::Terminated {
            return Err(DetectError::Terminated);
        }
        self.stats.ticks += 1;

        let image = match self.source.grab() {
            Ok(image) if image.width() > 0 && image.height() > 0 => image,
            Ok(_) | Err(CaptureError::Empty) => {
                log::warn!("[DETECT] Capture returned no pixels — skipping tick");
                self.stats.skipped += 1;
                return Ok(TickOutcome::Empty);
            }
            Err(e) => return Err(self.fail(DetectError::Capture(e))),
        };

        let frame = Frame::from_capture(&image);

        let outcome = match self.previous.as_ref() {
            None => {
                log::info!(
                    "[DETECT] First frame captured ({}x{}) — watching for changes",
                    image.width(),
                    image.height()
                );
                TickOutcome::Primed
            }
            Some(previous) => match frame.change_ratio(previous) {
                Err(FrameError::DimensionMismatch { previous, current }) => {
                    log::warn!(
                        "[DETECT] Frame size changed {}x{} -> {}x{} — skipping comparison",
                        previous.0,
                        previous.1,
                        current.0,
                        current.1
                    );
                    self.stats.skipped += 1;
                    TickOutcome::Resized { previous, current }
                }
                Ok(change_ratio) => {
                    self.stats.comparisons += 1;
                    if exceeds_threshold(change_ratio, self.threshold) {
                        let path = match self.sink.save(&image) {
                            Ok(path) => path,
                            Err(e) => return Err(self.fail(DetectError::Snapshot(e))),
                        };
                        self.stats.snapshots += 1;
                        log::info!(
                            "[DETECT] Change {:.2}% exceeds {:.2}% — saved {}",
                            change_ratio * 100.0,
                            self.threshold * 100.0,
                            path.display()
                        );
                        TickOutcome::Saved { change_ratio, path }
                    } else {
                        log::debug!("[DETECT] Change {:.2}%", change_ratio * 100.0);
                        TickOutcome::Unchanged { change_ratio }
                    }
                }
            },
        };

        self.previous = Some(frame);
        self.state = WatchState::Steady;
        Ok(outcome)
    }

    /// Ticks at the configured interval until `shutdown` resolves or a
    /// tick fails.
    ///
    /// `shutdown` is only observed while sleeping, so a tick in progress
    /// always finishes (including any snapshot write) before the loop stops.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<SessionStats, DetectError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        log::info!(
            "[DETECT] Sampling every {:.2}s, threshold {:.2}%",
            self.interval.as_secs_f64(),
            self.threshold * 100.0
        );

        loop {
            if let Err(e) = self.tick() {
                log::error!("[DETECT] Stopping after unexpected failure: {}", e);
                log_summary(&self.stats);
                return Err(e);
            }

            tokio::select! {
                _ = &mut shutdown => {
                    self.state = WatchState::Terminated;
                    log::info!("[DETECT] Interrupted — monitoring stopped");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        log_summary(&self.stats);
        Ok(self.stats)
    }

    fn fail(&mut self, error: DetectError) -> DetectError {
        self.state = WatchState::Terminated;
        error
    }
}

fn log_summary(stats: &SessionStats) {
    log::info!(
        "[DETECT] {} ticks, {} comparisons, {} snapshots, {} skipped",
        stats.ticks,
        stats.comparisons,
        stats.snapshots,
        stats.skipped
    );
}

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Snapshot could not be written: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Watcher already terminated")]
    Terminated,
}
