//! Thumbnail generation service
//!
//! This module provides the per-request thumbnail pipeline:
//! - Parameter extraction and validation
//! - Remote download into a per-session working file
//! - Image processor for letterboxing and encoding
//! - Streaming response with guaranteed working-file cleanup

pub mod fetcher;
pub mod params;
pub mod processor;
pub mod response;
pub mod service;
pub mod temp_file;

pub use fetcher::{HttpImageFetcher, ImageFetcher};
pub use params::{extract_params, parse_query};
pub use processor::{compute_geometry, letterbox, ThumbnailConfig, ThumbnailProcessor};
pub use response::upload_response;
pub use service::ThumbnailService;
pub use temp_file::TempFile;
