//! Remote image download
//!
//! Streams the remote body straight into the request's working file.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Downloads a remote resource into a local file
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Write the body of `url` to `dest`, returning the number of bytes written
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// reqwest-backed fetcher used in production
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    http_client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {e}")))?;

        info!(timeout_secs = timeout.as_secs(), "HTTP image fetcher initialized");

        Ok(Self { http_client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64> {
        debug!(url = %url, dest = %dest.display(), "Downloading image");

        let mut response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(format!(
                "Download failed with status {}",
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to read response body: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url = %url, size = written, "Downloaded image");
        Ok(written)
    }
}
