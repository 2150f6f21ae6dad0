//! Region selection domain — public API.
//!
//! Resolves the rectangle to watch: interactively from two clicks, or by
//! validating one saved from a previous session.

mod listener;
mod preview;
mod selector;

pub use listener::PointerEvents;
pub use preview::{draw_outline, preview_or_warn, show_preview, PreviewError};
pub use selector::{
    collect_corners, select_region, PointerButton, PointerEvent, SelectionError,
};

use crate::capture::{Point, Rectangle};

/// Interactive mode: blocks until the operator clicks two opposite corners.
pub fn select_interactively() -> Result<Rectangle, SelectionError> {
    println!("Click the two opposite corners of the region to watch.");
    log::info!("[SELECT] Waiting for two left clicks");

    let events = PointerEvents::listen()?;
    let rect = select_region(events, report_click)?;

    log::info!("[SELECT] Region selected: {}", rect);
    Ok(rect)
}

/// Reuse mode: accepts a saved rectangle only if it is well-formed.
pub fn reuse_region(saved: Rectangle) -> Result<Rectangle, SelectionError> {
    let rect = saved.validated()?;
    log::info!("[SELECT] Reusing saved region {}", rect);
    Ok(rect)
}

fn report_click(index: usize, at: Point) {
    println!("Corner {}: ({}, {})", index, at.x, at.y);
    log::info!("[SELECT] Click {} at ({}, {})", index, at.x, at.y);
}
