//! Query parameter extraction and validation
//!
//! Turns the untrusted query map into a [`ThumbnailRequest`]. Checks run in a
//! fixed order and the first failure short-circuits the rest; a session ID is
//! only allocated once every check has passed.

use crate::error::{AppError, Result};
use crate::models::ThumbnailRequest;
use crate::services::session::SessionRegistry;
use std::collections::HashMap;
use tracing::debug;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["jpeg", "jpg"];

/// Parse a raw query string, keeping the first value of repeated keys
pub fn parse_query(query_string: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
        values
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    values
}

/// Validate the query map and allocate a session for it
pub fn extract_params(
    query: &HashMap<String, String>,
    registry: &SessionRegistry,
    max_dimension: u32,
) -> Result<ThumbnailRequest> {
    let source_url = match query.get("url") {
        Some(url) if !url.is_empty() => url.clone(),
        _ => {
            debug!("url parameter missing");
            return Err(AppError::validation("url not found"));
        }
    };

    let target_width = parse_dimension(query, "width", max_dimension)?;
    let target_height = parse_dimension(query, "height", max_dimension)?;

    let source_file_name = extract_file_name(&source_url)?.to_string();

    let session_id = registry.allocate_session_id();
    let temp_file_path = registry
        .temp_directory()
        .join(format!("{session_id}{source_file_name}"));

    Ok(ThumbnailRequest {
        source_url,
        target_width,
        target_height,
        session_id,
        source_file_name,
        temp_file_path,
    })
}

fn parse_dimension(query: &HashMap<String, String>, key: &str, max: u32) -> Result<u32> {
    let raw = match query.get(key) {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            debug!(parameter = key, "dimension parameter missing");
            return Err(AppError::validation(format!("{key} not found")));
        }
    };

    // Zero, negative and oversized values are all rejected the same way.
    match raw.parse::<i64>() {
        Ok(value) if value > 0 && value <= i64::from(max) => Ok(value as u32),
        _ => {
            debug!(parameter = key, value = %raw, "dimension parameter not valid");
            Err(AppError::validation(format!("{key} not valid")))
        }
    }
}

/// Take the last path segment of `url` and check its extension
pub fn extract_file_name(url: &str) -> Result<&str> {
    let file_name = url.rsplit('/').next().unwrap_or_default();

    match file_name.rsplit_once('.') {
        Some((_, extension)) if is_supported_extension(extension) => Ok(file_name),
        _ => {
            debug!(file_name, "file type not supported");
            Err(AppError::validation("file type not supported"))
        }
    }
}

/// Case-insensitive check against the supported extensions
pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(extension))
}
