//! Snapshot writer — persists triggered captures as timestamped PNGs.

use crate::detect::SnapshotSink;
use chrono::{DateTime, Local};
use image::{ImageFormat, RgbaImage};
use std::path::PathBuf;

/// Writes `{prefix}_{YYYYmmdd_HHMMSS_micros}.png` files into one directory.
pub struct SnapshotWriter {
    directory: PathBuf,
    prefix: String,
}

impl SnapshotWriter {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// File name for a snapshot taken at `at`.
    pub fn file_name(&self, at: DateTime<Local>) -> String {
        format!("{}_{}.png", self.prefix, at.format("%Y%m%d_%H%M%S_%6f"))
    }

    /// Writes `image` into the destination directory, creating it if needed.
    pub fn write(&self, image: &RgbaImage) -> Result<PathBuf, SnapshotError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SnapshotError::ZeroArea);
        }

        std::fs::create_dir_all(&self.directory).map_err(|e| SnapshotError::CreateDir {
            path: self.directory.clone(),
            source: e,
        })?;

        let path = self.directory.join(self.file_name(Local::now()));
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| SnapshotError::Encode {
                path: path.clone(),
                source: e,
            })?;

        println!("Snapshot saved: {}", path.display());
        log::info!(
            "[SNAPSHOT] Wrote {}x{} to {}",
            image.width(),
            image.height(),
            path.display()
        );
        Ok(path)
    }
}

impl SnapshotSink for SnapshotWriter {
    fn save(&mut self, image: &RgbaImage) -> Result<PathBuf, SnapshotError> {
        self.write(image)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Refusing to save a snapshot with zero width or height")]
    ZeroArea,

    #[error("Failed to create snapshot directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}
