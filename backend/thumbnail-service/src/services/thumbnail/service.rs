//! Thumbnail service - coordinates one request through the pipeline
//!
//! This service handles the complete thumbnail workflow:
//! 1. Validate query parameters and allocate a session
//! 2. Download the original image into the session's working file
//! 3. Letterbox it to the requested size
//! 4. Stream the result back
//!
//! The working file is removed on every exit path.

use super::fetcher::ImageFetcher;
use super::params::extract_params;
use super::processor::{ThumbnailConfig, ThumbnailProcessor};
use super::response::upload_response;
use super::temp_file::TempFile;
use crate::config::ThumbnailSettings;
use crate::error::Result;
use crate::services::session::SessionRegistry;
use actix_web::HttpResponse;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared, cheaply clonable handle to the thumbnail pipeline
#[derive(Clone)]
pub struct ThumbnailService {
    registry: Arc<SessionRegistry>,
    fetcher: Arc<dyn ImageFetcher>,
    processor: Arc<ThumbnailProcessor>,
    settings: ThumbnailSettings,
}

impl ThumbnailService {
    pub fn new(
        registry: Arc<SessionRegistry>,
        fetcher: Arc<dyn ImageFetcher>,
        settings: ThumbnailSettings,
    ) -> Self {
        let processor = Arc::new(ThumbnailProcessor::new(ThumbnailConfig {
            quality: settings.jpeg_quality,
        }));

        Self {
            registry,
            fetcher,
            processor,
            settings,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Run one request through the pipeline
    pub async fn handle(&self, query: &HashMap<String, String>) -> Result<HttpResponse> {
        let request = extract_params(query, &self.registry, self.settings.max_dimension)?;

        info!(
            session_id = request.session_id,
            url = %request.source_url,
            width = request.target_width,
            height = request.target_height,
            "Generating thumbnail"
        );

        // Owned from here on; dropping it removes whatever the download left behind.
        let temp_file = TempFile::new(&request.temp_file_path);

        let size = self
            .fetcher
            .fetch_to(&request.source_url, temp_file.path())
            .await
            .map_err(|e| {
                warn!(session_id = request.session_id, error = %e, "Image download failed");
                e
            })?;

        let (temp_file, geometry) = self
            .processor
            .clone()
            .process_file_async(
                temp_file,
                request.target_width,
                request.target_height,
                self.settings.processing_timeout(),
            )
            .await
            .map_err(|e| {
                warn!(session_id = request.session_id, error = %e, "Thumbnail processing failed");
                e
            })?;

        info!(
            session_id = request.session_id,
            original_size = size,
            resize_width = geometry.resize_width,
            resize_height = geometry.resize_height,
            fit = ?geometry.fit,
            "Thumbnail created successfully"
        );

        upload_response(temp_file, &request.source_file_name).await
    }
}

impl std::fmt::Debug for ThumbnailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailService")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
