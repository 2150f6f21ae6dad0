//! Luminance frames and the change-ratio comparison.
//!
//! Pure pixel math, no I/O. A frame is one grayscale sample of the
//! watched region; two frames of the same size can be compared.

use image::{GrayImage, RgbaImage};

/// Minimum per-pixel intensity difference (0–255) that counts as a change.
pub const CHANGE_DELTA: u8 = 30;

/// One single-channel sample of the watched region.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: GrayImage,
}

impl Frame {
    /// Converts a full-colour region capture to luminance.
    pub fn from_capture(image: &RgbaImage) -> Self {
        Self {
            pixels: image::imageops::grayscale(image),
        }
    }

    pub fn from_luma(pixels: GrayImage) -> Self {
        Self { pixels }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.as_raw().len()
    }

    /// Fraction of pixels whose intensity moved by more than
    /// [`CHANGE_DELTA`] since `previous`.
    ///
    /// Always in `[0, 1]`. Frames of different sizes cannot be compared.
    pub fn change_ratio(&self, previous: &Frame) -> Result<f64, FrameError> {
        if self.dimensions() != previous.dimensions() {
            return Err(FrameError::DimensionMismatch {
                previous: previous.dimensions(),
                current: self.dimensions(),
            });
        }

        let total = self.pixel_count();
        if total == 0 {
            return Ok(0.0);
        }

        let changed = self
            .pixels
            .as_raw()
            .iter()
            .zip(previous.pixels.as_raw())
            .filter(|(now, before)| now.abs_diff(**before) > CHANGE_DELTA)
            .count();

        Ok(changed as f64 / total as f64)
    }
}

/// Save decision for one comparison. Strictly greater-than: a ratio equal
/// to the threshold does not trigger.
pub fn exceeds_threshold(change_ratio: f64, threshold: f64) -> bool {
    change_ratio > threshold
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(
        "Frame size changed from {}x{} to {}x{}",
        previous.0, previous.1, current.0, current.1
    )]
    DimensionMismatch {
        previous: (u32, u32),
        current: (u32, u32),
    },
}
