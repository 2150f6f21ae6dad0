//! Pure region geometry and cropping logic — functional core.
//!
//! This module has zero infrastructure dependencies.
//! It takes corner points and pixel data in, returns rectangles and
//! pixel data out.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// A point in global screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The monitored screen rectangle, in global screen coordinates.
///
/// `x1`/`y1` is the top-left corner, `x2`/`y2` the bottom-right one
/// (exclusive). A usable rectangle always has `x1 < x2` and `y1 < y2`;
/// use [`Rectangle::validated`] before handing one to the capture layer.
///
/// Serialized as a flat `[x1, y1, x2, y2]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Rectangle {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rectangle {
    /// Builds a rectangle exactly as given, without normalizing.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a normalized rectangle from two opposite corners, in either
    /// click order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    /// Returns the same area with `x1`/`y1` as the minimum corner.
    pub fn normalized(&self) -> Self {
        Self::from_corners(Point::new(self.x1, self.y1), Point::new(self.x2, self.y2))
    }

    pub fn is_valid(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }

    /// Checks `x1 < x2` and `y1 < y2` as stored. Inverted rectangles are
    /// rejected here, not silently flipped.
    pub fn validated(self) -> Result<Self, RegionError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(RegionError::InvalidRegion(self))
        }
    }

    /// Width in pixels; zero for degenerate or inverted rectangles.
    pub fn width(&self) -> u32 {
        (self.x2 as i64 - self.x1 as i64).max(0) as u32
    }

    /// Height in pixels; zero for degenerate or inverted rectangles.
    pub fn height(&self) -> u32 {
        (self.y2 as i64 - self.y1 as i64).max(0) as u32
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Translates this rectangle into the local pixel space of a surface
    /// whose top-left corner sits at `origin`, clipped to `width` × `height`.
    ///
    /// Returns `(x, y, width, height)` of the visible part, or `None` when
    /// nothing of the rectangle falls on the surface.
    pub fn clip_to(&self, origin: Point, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = (self.x1 as i64 - origin.x as i64).max(0);
        let top = (self.y1 as i64 - origin.y as i64).max(0);
        let right = (self.x2 as i64 - origin.x as i64).min(width as i64);
        let bottom = (self.y2 as i64 - origin.y as i64).min(height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some((
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

/// Maps a box in monitor-local logical coordinates onto a captured buffer.
///
/// `logical` is the monitor size as reported by the OS, `pixels` the size of
/// its screenshot; on a 2x display the box doubles in every dimension. Edges
/// are rounded outward and clamped to the buffer. Returns `None` when the
/// result is empty or either size is zero.
pub fn to_pixel_box(
    (x, y, width, height): (u32, u32, u32, u32),
    logical: (u32, u32),
    pixels: (u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    if logical.0 == 0 || logical.1 == 0 {
        return None;
    }

    let sx = pixels.0 as f64 / logical.0 as f64;
    let sy = pixels.1 as f64 / logical.1 as f64;

    let left = (x as f64 * sx).floor().min(pixels.0 as f64) as u32;
    let top = (y as f64 * sy).floor().min(pixels.1 as f64) as u32;
    let right = ((x as f64 + width as f64) * sx).ceil().min(pixels.0 as f64) as u32;
    let bottom = ((y as f64 + height as f64) * sy).ceil().min(pixels.1 as f64) as u32;

    if right <= left || bottom <= top {
        return None;
    }

    Some((left, top, right - left, bottom - top))
}

impl From<[i32; 4]> for Rectangle {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rectangle> for [i32; 4] {
    fn from(r: Rectangle) -> Self {
        [r.x1, r.y1, r.x2, r.y2]
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("Invalid region {0}: width and height must be positive")]
    InvalidRegion(Rectangle),
}

/// Crops an image to the specified rectangle.
///
/// This is a pure function with no side effects.
///
/// # Arguments
/// * `image` - The full screenshot
/// * `x` - Left edge of the crop rectangle
/// * `y` - Top edge of the crop rectangle
/// * `width` - Width of the crop rectangle
/// * `height` - Height of the crop rectangle
pub fn crop_region(
    image: &RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<RgbaImage, CropError> {
    if width == 0 || height == 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = image.dimensions();

    if x as u64 + width as u64 > img_width as u64 || y as u64 + height as u64 > img_height as u64 {
        return Err(CropError::OutOfBounds {
            requested: (x, y, width, height),
            image_size: (img_width, img_height),
        });
    }

    Ok(image::imageops::crop_imm(image, x, y, width, height).to_image())
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds image bounds ({}x{})",
        requested.0, requested.1, requested.2, requested.3,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: (u32, u32, u32, u32),
        image_size: (u32, u32),
    },
}
