//! Region preview — draws the selected rectangle over a fresh screenshot
//! and shows it in the platform image viewer.
//!
//! Purely a confirmation aid. Callers go through `preview_or_warn`, which
//! never fails.

use crate::capture::{self, CaptureError, Rectangle};
use crate::prompt;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::thread::JoinHandle;

const OUTLINE_COLOR: Rgba<u8> = Rgba([255, 40, 40, 255]);
const OUTLINE_THICKNESS: u32 = 3;

/// Shows the preview and waits for the operator to dismiss it. Failures
/// are logged and swallowed.
pub fn preview_or_warn(rect: &Rectangle) {
    if let Err(e) = show_preview(rect) {
        log::warn!("[PREVIEW] Could not show region preview: {}", e);
    }
}

/// Captures the monitor under `rect`, outlines `rect` on it, opens the
/// result, and blocks until Enter.
pub fn show_preview(rect: &Rectangle) -> Result<(), PreviewError> {
    let mut shot = capture::capture_monitor_at(rect.top_left())?;

    let (x, y, width, height) = shot.locate(rect).ok_or(PreviewError::OffScreen(*rect))?;

    draw_outline(&mut shot.image, x, y, width, height, OUTLINE_THICKNESS, OUTLINE_COLOR);

    let path = preview_path();
    shot.image
        .save(&path)
        .map_err(|e| PreviewError::Write(e.to_string()))?;
    log::info!("[PREVIEW] Overlay written to {}", path.display());

    open_in_viewer(&path)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let waited = prompt::wait_for_enter(
        &mut stdin.lock(),
        &mut stdout,
        "Region preview opened. Press Enter to continue...",
    );

    let _ = std::fs::remove_file(&path);
    waited.map_err(|e| PreviewError::Write(e.to_string()))
}

fn preview_path() -> PathBuf {
    std::env::temp_dir().join(format!("region-watch-preview-{}.png", std::process::id()))
}

/// Draws a `thickness`-pixel border just inside the given box, clipped to
/// the image.
pub fn draw_outline(
    image: &mut RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    thickness: u32,
    color: Rgba<u8>,
) {
    let right = x.saturating_add(width).min(image.width());
    let bottom = y.saturating_add(height).min(image.height());

    for py in y..bottom {
        for px in x..right {
            let on_edge = px < x + thickness
                || py < y + thickness
                || px + thickness >= right
                || py + thickness >= bottom;
            if on_edge {
                image.put_pixel(px, py, color);
            }
        }
    }
}

fn viewer_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

fn open_in_viewer(path: &Path) -> Result<(), PreviewError> {
    let name = viewer_command();
    let program = which::which(name).map_err(|_| PreviewError::NoViewer(name.to_string()))?;

    launch_detached(&program, path)?;
    Ok(())
}

/// Starts `program path` and reaps it on a background thread once it exits,
/// so the viewer can outlive the prompt without leaving a zombie behind.
fn launch_detached(program: &Path, path: &Path) -> Result<JoinHandle<Option<ExitStatus>>, PreviewError> {
    let mut child = Command::new(program)
        .arg(path)
        .spawn()
        .map_err(|e| PreviewError::Launch(e.to_string()))?;

    std::thread::Builder::new()
        .name("viewer-reaper".into())
        .spawn(move || {
            let status = child.wait().ok();
            if let Some(status) = status {
                log::debug!("[PREVIEW] Viewer exited with {}", status);
            }
            status
        })
        .map_err(|e| PreviewError::Launch(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Region {0} is not on the captured monitor")]
    OffScreen(Rectangle),

    #[error("Failed to write preview: {0}")]
    Write(String),

    #[error("No image viewer found ('{0}' is not on PATH)")]
    NoViewer(String),

    #[error("Failed to launch image viewer: {0}")]
    Launch(String),
}
