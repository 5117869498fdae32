//! Thumbnail processor - resizes a downloaded image into a letterboxed thumbnail
//!
//! The source is scaled to fit the target box while keeping its aspect ratio,
//! pasted centered onto a transparent canvas of exactly the target size, and
//! written back over the working file as JPEG.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the async runtime.

use super::temp_file::TempFile;
use crate::error::{AppError, Result};
use crate::models::{Fit, ThumbnailGeometry};
use image::imageops::{self, FilterType};
use image::io::Reader as ImageReader;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Ratios are compared after scaling by this factor and truncating, so close
/// ratios count as equal.
const RATIO_BUCKETS: f64 = 3.0;

/// Configuration for thumbnail generation
#[derive(Clone, Debug)]
pub struct ThumbnailConfig {
    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self { quality: 95 }
    }
}

/// Thumbnail processor
#[derive(Debug)]
pub struct ThumbnailProcessor {
    config: ThumbnailConfig,
}

impl ThumbnailProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Create a processor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ThumbnailConfig::default())
    }

    /// Decode `path`, letterbox it to `target_width x target_height` and
    /// overwrite `path` with the result (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not be called
    /// directly from async code. Use `process_file_async` instead.
    pub fn process_file(
        &self,
        path: &Path,
        target_width: u32,
        target_height: u32,
    ) -> Result<ThumbnailGeometry> {
        let source = decode_jpeg(path)?;

        let (canvas, geometry) = letterbox(&source, target_width, target_height)?;

        self.encode_jpeg(canvas, path)?;

        debug!(
            path = %path.display(),
            resize_width = geometry.resize_width,
            resize_height = geometry.resize_height,
            fit = ?geometry.fit,
            "Thumbnail written"
        );

        Ok(geometry)
    }

    /// Run [`Self::process_file`] on the blocking thread pool
    ///
    /// The temp file guard travels with the blocking task and is handed back
    /// on success, so the file is only removed once no thread touches it
    /// anymore, even when the caller gives up waiting.
    pub async fn process_file_async(
        self: Arc<Self>,
        temp_file: TempFile,
        target_width: u32,
        target_height: u32,
        timeout: Duration,
    ) -> Result<(TempFile, ThumbnailGeometry)> {
        let task = tokio::task::spawn_blocking(move || -> Result<(TempFile, ThumbnailGeometry)> {
            let geometry = self.process_file(temp_file.path(), target_width, target_height)?;
            Ok((temp_file, geometry))
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(joined) => {
                joined.map_err(|e| AppError::Resize(format!("Thumbnail task panicked: {e}")))?
            }
            Err(_) => Err(AppError::Resize(format!(
                "Thumbnail processing timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    /// Flatten onto RGB and encode as JPEG over `path`
    fn encode_jpeg(&self, canvas: RgbaImage, path: &Path) -> Result<()> {
        let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();

        let file = File::create(path).map_err(|e| {
            AppError::Encode(format!("Failed to save image {}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);

        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut writer, ImageOutputFormat::Jpeg(self.config.quality))
            .map_err(|e| {
                AppError::Encode(format!("Failed to save image {}: {e}", path.display()))
            })?;

        Ok(())
    }
}

/// Decode `path` strictly as JPEG
pub fn decode_jpeg(path: &Path) -> Result<DynamicImage> {
    let decode_error = |e: &dyn std::fmt::Display| {
        AppError::Decode(format!("Decode Error file: {} ({e})", path.display()))
    };

    let mut reader = ImageReader::open(path).map_err(|e| decode_error(&e))?;
    reader.set_format(ImageFormat::Jpeg);
    let image = reader.decode().map_err(|e| decode_error(&e))?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AppError::Decode(format!(
            "Decode Error file: {} (empty image)",
            path.display()
        )));
    }

    Ok(image)
}

/// Compute resize dimensions and paste offset for fitting
/// `orig_width x orig_height` into `target_width x target_height`
pub fn compute_geometry(
    orig_width: u32,
    orig_height: u32,
    target_width: u32,
    target_height: u32,
) -> ThumbnailGeometry {
    let orig_ratio = f64::from(orig_width) / f64::from(orig_height);
    let dst_ratio = f64::from(target_width) / f64::from(target_height);

    let (resize_width, resize_height, fit) =
        if (orig_ratio * RATIO_BUCKETS).floor() == (dst_ratio * RATIO_BUCKETS).floor() {
            // Close enough: never upscale, otherwise fill the box exactly.
            if orig_width < target_width {
                (orig_width, orig_height, Fit::KeepOriginal)
            } else {
                (target_width, target_height, Fit::Exact)
            }
        } else if dst_ratio > orig_ratio {
            let width = (f64::from(target_height) * orig_ratio).floor() as u32;
            (width.max(1), target_height, Fit::Pillarbox)
        } else {
            let height = (f64::from(target_width) / orig_ratio).floor() as u32;
            (target_width, height.max(1), Fit::Letterbox)
        };

    ThumbnailGeometry {
        resize_width,
        resize_height,
        offset_x: (i64::from(target_width) - i64::from(resize_width)) / 2,
        offset_y: (i64::from(target_height) - i64::from(resize_height)) / 2,
        fit,
    }
}

/// Scale `source` to fit and paste it centered on a transparent canvas of
/// exactly `target_width x target_height`
pub fn letterbox(
    source: &DynamicImage,
    target_width: u32,
    target_height: u32,
) -> Result<(RgbaImage, ThumbnailGeometry)> {
    if target_width == 0 || target_height == 0 {
        return Err(AppError::Resize(format!(
            "Invalid target size {target_width}x{target_height}"
        )));
    }

    let (orig_width, orig_height) = source.dimensions();
    let geometry = compute_geometry(orig_width, orig_height, target_width, target_height);

    let mut canvas = RgbaImage::from_pixel(target_width, target_height, Rgba([0, 0, 0, 0]));
    let resized = source
        .resize_exact(geometry.resize_width, geometry.resize_height, FilterType::Lanczos3)
        .to_rgba8();

    imageops::replace(&mut canvas, &resized, geometry.offset_x, geometry.offset_y);

    Ok((canvas, geometry))
}
