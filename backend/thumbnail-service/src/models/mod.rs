/// Data models for thumbnail-service
use std::path::PathBuf;

/// A validated thumbnail request. Built once per incoming request and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    /// Remote image to fetch
    pub source_url: String,
    pub target_width: u32,
    pub target_height: u32,
    /// Unique within the process lifetime
    pub session_id: u64,
    /// Last path segment of `source_url`
    pub source_file_name: String,
    /// `<temp_directory>/<session_id><source_file_name>`, owned by this request only
    pub temp_file_path: PathBuf,
}

/// Outcome of the resize-and-letterbox step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailGeometry {
    pub resize_width: u32,
    pub resize_height: u32,
    /// Horizontal paste offset on the canvas, negative when the image is cropped
    pub offset_x: i64,
    pub offset_y: i64,
    pub fit: Fit,
}

/// Which branch of the geometry computation produced the resize dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Ratios fall in the same bucket and the source is narrower than the target
    KeepOriginal,
    /// Ratios fall in the same bucket, scaled straight to the target box
    Exact,
    /// Target relatively wider: padded left and right
    Pillarbox,
    /// Target relatively taller: padded top and bottom
    Letterbox,
}
