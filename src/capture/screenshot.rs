//! Screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS.
//! Everything above it only sees `RgbaImage`s and `CaptureError`s.

use super::region::{crop_region, to_pixel_box, Point, Rectangle};
use crate::detect::FrameSource;
use image::RgbaImage;
use xcap::Monitor;

/// A full-monitor screenshot together with the monitor's placement.
///
/// `origin` and `logical_size` are in the OS's logical coordinates (the
/// space pointer clicks are reported in). `image` is in physical pixels,
/// which differ on scaled displays.
pub struct MonitorShot {
    pub origin: Point,
    pub logical_size: (u32, u32),
    pub image: RgbaImage,
}

impl MonitorShot {
    /// Pixel box of `rect` inside `image`, or `None` if `rect` is not on
    /// this monitor.
    pub fn locate(&self, rect: &Rectangle) -> Option<(u32, u32, u32, u32)> {
        let logical = rect.clip_to(self.origin, self.logical_size.0, self.logical_size.1)?;
        to_pixel_box(logical, self.logical_size, self.image.dimensions())
    }
}

/// Captures the whole monitor under `point`.
pub fn capture_monitor_at(point: Point) -> Result<MonitorShot, CaptureError> {
    let monitor = Monitor::from_point(point.x, point.y)
        .map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    let origin = Point::new(geometry(monitor.x())?, geometry(monitor.y())?);
    let logical_size = (geometry(monitor.width())?, geometry(monitor.height())?);

    let image = monitor
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    Ok(MonitorShot {
        origin,
        logical_size,
        image,
    })
}

fn geometry<T, E: std::fmt::Display>(value: Result<T, E>) -> Result<T, CaptureError> {
    value.map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))
}

/// Captures `rect` at full resolution from the monitor under its top-left
/// corner.
///
/// Parts of the rectangle hanging off that monitor are clipped away. If
/// nothing is left, or the backend hands back an empty buffer, the result
/// is `CaptureError::Empty`.
pub fn capture_rect(rect: &Rectangle) -> Result<RgbaImage, CaptureError> {
    let shot = capture_monitor_at(rect.top_left())?;

    let (x, y, width, height) = shot.locate(rect).ok_or(CaptureError::Empty)?;

    crop_region(&shot.image, x, y, width, height).map_err(|e| {
        log::debug!("[CAPTURE] Crop of {} failed: {}", rect, e);
        CaptureError::Empty
    })
}

/// A live screen region, sampled on every `grab`.
pub struct ScreenRegion {
    rect: Rectangle,
}

impl ScreenRegion {
    pub fn new(rect: Rectangle) -> Self {
        Self { rect }
    }
}

impl FrameSource for ScreenRegion {
    fn grab(&mut self) -> Result<RgbaImage, CaptureError> {
        let start = std::time::Instant::now();
        let image = capture_rect(&self.rect)?;
        log::trace!(
            "[CAPTURE] {}x{} region captured in {}ms",
            image.width(),
            image.height(),
            start.elapsed().as_millis()
        );
        Ok(image)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Capture returned no pixels")]
    Empty,
}
