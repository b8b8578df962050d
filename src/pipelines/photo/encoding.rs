// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding and saving
//!
//! Encodes the two images of a [`CapturedPhoto`] and writes them next to each
//! other, `<stem>.<ext>` and `<stem>-preview.<ext>`. Encoding and disk I/O run
//! on tokio's blocking pool.

use super::CapturedPhoto;
use crate::errors::{AppError, AppResult};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingFormat {
    /// JPEG format (lossy compression)
    Jpeg,
    /// PNG format (lossless compression)
    #[default]
    Png,
}

impl EncodingFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => "jpg",
            EncodingFormat::Png => "png",
        }
    }

    /// Pick a format from a file extension, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(EncodingFormat::Jpeg),
            "png" => Some(EncodingFormat::Png),
            _ => None,
        }
    }
}

/// Encoding quality settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingQuality {
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression)
    #[default]
    High,
    /// Maximum quality (minimal compression)
    Maximum,
}

impl EncodingQuality {
    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }
}

/// Paths written by [`PhotoEncoder::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPhoto {
    pub photo: PathBuf,
    pub preview: PathBuf,
}

/// Photo encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoEncoder {
    format: EncodingFormat,
    quality: EncodingQuality,
}

impl PhotoEncoder {
    pub fn new(format: EncodingFormat, quality: EncodingQuality) -> Self {
        Self { format, quality }
    }

    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    /// Timestamped file stem, e.g. `IMG_20240131_142501`
    pub fn timestamp_stem() -> String {
        format!("IMG_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
    }

    /// Encode both images and write them into `output_dir`
    pub async fn save(
        &self,
        photo: CapturedPhoto,
        output_dir: PathBuf,
        stem: String,
    ) -> AppResult<SavedPhoto> {
        let encoder = *self;
        let ext = self.format.extension();
        let paths = SavedPhoto {
            photo: output_dir.join(format!("{}.{}", stem, ext)),
            preview: output_dir.join(format!("{}-preview.{}", stem, ext)),
        };

        info!(path = %paths.photo.display(), "Saving photo");

        let written = paths.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&output_dir)?;
            encoder.write(&photo.photo, &written.photo)?;
            encoder.write(&photo.preview, &written.preview)?;
            Ok::<_, AppError>(())
        })
        .await
        .map_err(|e| AppError::Storage(format!("Save task error: {}", e)))??;

        info!(path = %paths.photo.display(), "Photo saved successfully");
        Ok(paths)
    }

    /// Encode `image` into memory
    pub fn encode(&self, image: &RgbaImage) -> AppResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        match self.format {
            EncodingFormat::Png => image.write_to(&mut cursor, ImageFormat::Png)?,
            EncodingFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
                let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut cursor,
                    self.quality.jpeg_quality(),
                );
                encoder.encode_image(&rgb)?;
            }
        }

        debug!(size = buffer.len(), format = ?self.format, "Encoding complete");
        Ok(buffer)
    }

    fn write(&self, image: &RgbaImage, path: &Path) -> AppResult<()> {
        let data = self.encode(image)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
