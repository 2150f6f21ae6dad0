//! Screen capture domain — public API.
//!
//! This module owns region geometry and all screen capture functionality.
//! External code should only use the items exported here.

mod region;
mod screenshot;

pub use region::{crop_region, to_pixel_box, CropError, Point, Rectangle, RegionError};
pub use screenshot::{capture_monitor_at, capture_rect, CaptureError, MonitorShot, ScreenRegion};
