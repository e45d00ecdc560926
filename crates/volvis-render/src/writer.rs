//! Image output for rendered projections.

use std::path::Path;

use image::{GrayImage, ImageFormat, RgbImage};

use crate::projection::{ColorImage, ProjectionImage};

/// Destination for rendered images.
pub trait ImageSink {
    /// Persists a grayscale projection at `path`.
    fn write_gray(&self, path: &Path, image: &ProjectionImage) -> Result<(), ImageWriteError>;

    /// Persists an RGB image at `path`.
    fn write_rgb(&self, path: &Path, image: &ColorImage) -> Result<(), ImageWriteError>;
}

/// Writes images to disk, picking the encoder from the file extension.
///
/// Supported extensions: `tif`, `tiff`, `png`, `jpg`, `jpeg`, `bmp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageWriter;

impl FileImageWriter {
    /// Creates a writer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ImageSink for FileImageWriter {
    fn write_gray(&self, path: &Path, image: &ProjectionImage) -> Result<(), ImageWriteError> {
        let format = format_for(path)?;
        let img = GrayImage::from_raw(image.width(), image.height(), image.pixels().to_vec())
            .ok_or(ImageWriteError::InvalidImageData)?;
        img.save_with_format(path, format)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn write_rgb(&self, path: &Path, image: &ColorImage) -> Result<(), ImageWriteError> {
        let format = format_for(path)?;
        let img = RgbImage::from_raw(image.width(), image.height(), image.to_rgb_bytes())
            .ok_or(ImageWriteError::InvalidImageData)?;
        img.save_with_format(path, format)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

fn format_for(path: &Path) -> Result<ImageFormat, ImageWriteError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "tif" | "tiff" => Ok(ImageFormat::Tiff),
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "bmp" => Ok(ImageFormat::Bmp),
        _ => Err(ImageWriteError::UnsupportedFormat(extension)),
    }
}

/// Error type for image output.
#[derive(Debug, thiserror::Error)]
pub enum ImageWriteError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}
