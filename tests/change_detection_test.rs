//! Integration tests for the change-detection loop.
//!
//! Drives `ChangeWatcher` with scripted captures so no display is needed.

use image::{Rgba, RgbaImage};
use region_watch_lib::capture::CaptureError;
use region_watch_lib::detect::{
    ChangeWatcher, DetectError, FrameSource, SnapshotSink, TickOutcome, WatchState,
};
use region_watch_lib::snapshot::{SnapshotError, SnapshotWriter};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

// ── Helpers ─────────────────────────────────────────────────────────

struct Scripted {
    frames: VecDeque<Result<RgbaImage, CaptureError>>,
    grabs: usize,
}

impl Scripted {
    fn new(frames: Vec<Result<RgbaImage, CaptureError>>) -> Self {
        Self {
            frames: frames.into(),
            grabs: 0,
        }
    }
}

impl FrameSource for Scripted {
    fn grab(&mut self) -> Result<RgbaImage, CaptureError> {
        self.grabs += 1;
        self.frames
            .pop_front()
            .unwrap_or_else(|| Err(CaptureError::CaptureFailed("no more frames".into())))
    }
}

/// Alternates black and white forever, so every comparison changes fully.
struct Flicker {
    next_white: bool,
}

impl FrameSource for Flicker {
    fn grab(&mut self) -> Result<RgbaImage, CaptureError> {
        let v = if self.next_white { 255 } else { 0 };
        self.next_white = !self.next_white;
        Ok(solid(16, 16, v))
    }
}

#[derive(Default)]
struct Recorder {
    saved: Vec<(u32, u32)>,
}

impl SnapshotSink for Recorder {
    fn save(&mut self, image: &RgbaImage) -> Result<PathBuf, SnapshotError> {
        self.saved.push(image.dimensions());
        Ok(PathBuf::from(format!("snap_{}.png", self.saved.len())))
    }
}

fn solid(w: u32, h: u32, v: u8) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([v, v, v, 255]))
}

/// 100x100, left half white, right half black.
fn half_white() -> RgbaImage {
    RgbaImage::from_fn(100, 100, |x, _| {
        if x < 50 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

/// 10x10 black frame with the first `n` pixels (row-major) white.
fn with_changed(n: u32) -> RgbaImage {
    RgbaImage::from_fn(10, 10, |x, y| {
        if y * 10 + x < n {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

fn watcher(
    frames: Vec<Result<RgbaImage, CaptureError>>,
    threshold: f64,
) -> ChangeWatcher<Scripted, Recorder> {
    ChangeWatcher::new(
        Scripted::new(frames),
        Recorder::default(),
        threshold,
        Duration::from_secs(1),
    )
}

// ── Comparison scenarios ────────────────────────────────────────────

#[test]
fn identical_black_frames_do_not_save() {
    let mut w = watcher(vec![Ok(solid(100, 100, 0)), Ok(solid(100, 100, 0))], 0.05);
    assert_eq!(w.tick().unwrap(), TickOutcome::Primed);
    assert_eq!(
        w.tick().unwrap(),
        TickOutcome::Unchanged { change_ratio: 0.0 }
    );
    assert_eq!(w.stats().snapshots, 0);
}

#[test]
fn half_white_frame_triggers_save() {
    let mut w = watcher(vec![Ok(solid(100, 100, 0)), Ok(half_white())], 0.05);
    w.tick().unwrap();
    match w.tick().unwrap() {
        TickOutcome::Saved { change_ratio, .. } => assert_eq!(change_ratio, 0.5),
        other => panic!("expected a save, got {:?}", other),
    }
    assert_eq!(w.stats().snapshots, 1);
}

#[test]
fn ratio_equal_to_threshold_does_not_save() {
    let mut w = watcher(vec![Ok(with_changed(0)), Ok(with_changed(50))], 0.5);
    w.tick().unwrap();
    assert_eq!(
        w.tick().unwrap(),
        TickOutcome::Unchanged { change_ratio: 0.5 }
    );
}

#[test]
fn ratio_just_above_threshold_saves() {
    let mut w = watcher(vec![Ok(with_changed(0)), Ok(with_changed(51))], 0.5);
    w.tick().unwrap();
    assert!(matches!(w.tick().unwrap(), TickOutcome::Saved { .. }));
}

#[test]
fn saves_on_every_changed_tick_without_debounce() {
    let frames = (0..5).map(|i| Ok(solid(8, 8, if i % 2 == 0 { 0 } else { 255 })));
    let mut w = watcher(frames.collect(), 0.1);
    for _ in 0..5 {
        w.tick().unwrap();
    }
    assert_eq!(w.stats().snapshots, 4);
    assert_eq!(w.stats().comparisons, 4);
}

// ── Recoverable conditions ──────────────────────────────────────────

#[test]
fn dimension_mismatch_skips_comparison_and_adopts_new_frame() {
    let mut w = watcher(
        vec![
            Ok(solid(100, 100, 0)),
            Ok(solid(80, 100, 255)),
            Ok(solid(80, 100, 255)),
        ],
        0.05,
    );
    w.tick().unwrap();
    assert_eq!(
        w.tick().unwrap(),
        TickOutcome::Resized {
            previous: (100, 100),
            current: (80, 100)
        }
    );
    assert_eq!(w.previous_dimensions(), Some((80, 100)));
    assert_eq!(w.state(), WatchState::Steady);

    // Compared against the resized frame, not the original.
    assert_eq!(
        w.tick().unwrap(),
        TickOutcome::Unchanged { change_ratio: 0.0 }
    );
}

#[test]
fn empty_capture_keeps_the_frame_from_before_it() {
    let mut w = watcher(
        vec![
            Ok(solid(50, 50, 0)),
            Err(CaptureError::Empty),
            Ok(solid(50, 50, 255)),
        ],
        0.05,
    );
    w.tick().unwrap();
    assert_eq!(w.tick().unwrap(), TickOutcome::Empty);
    assert_eq!(w.previous_dimensions(), Some((50, 50)));

    // The white frame is compared against the black one from tick 1.
    match w.tick().unwrap() {
        TickOutcome::Saved { change_ratio, .. } => assert_eq!(change_ratio, 1.0),
        other => panic!("expected a save, got {:?}", other),
    }
}

#[test]
fn zero_sized_capture_counts_as_empty() {
    let mut w = watcher(vec![Ok(RgbaImage::new(0, 0)), Ok(solid(4, 4, 0))], 0.05);
    assert_eq!(w.tick().unwrap(), TickOutcome::Empty);
    assert_eq!(w.state(), WatchState::Warmup);
    assert_eq!(w.tick().unwrap(), TickOutcome::Primed);
}

// ── Loop lifecycle ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn interrupt_during_sleep_stops_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("snaps");

    let w = ChangeWatcher::new(
        Flicker { next_white: false },
        SnapshotWriter::new(&dir, "test"),
        0.05,
        Duration::from_secs(1),
    );

    // Ticks at t=0, 1, 2; the interrupt lands half-way through the third sleep.
    let stats = w
        .run_until(tokio::time::sleep(Duration::from_millis(2500)))
        .await
        .unwrap();

    assert_eq!(stats.ticks, 3);
    assert_eq!(stats.snapshots, 2);

    let mut files: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    assert_eq!(files.len(), 2);
    for f in files {
        let img = image::open(&f).unwrap();
        assert_eq!((img.width(), img.height()), (16, 16));
    }
}

#[tokio::test(start_paused = true)]
async fn unexpected_capture_failure_ends_the_loop() {
    let w = watcher(
        vec![
            Ok(solid(8, 8, 0)),
            Ok(solid(8, 8, 0)),
            Err(CaptureError::CaptureFailed("display went away".into())),
            Ok(solid(8, 8, 0)),
        ],
        0.1,
    );

    let result = w.run_until(std::future::pending::<()>()).await;
    assert!(matches!(result, Err(DetectError::Capture(_))));
}
