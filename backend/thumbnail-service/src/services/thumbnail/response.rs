//! Streams the finished thumbnail back to the client
//!
//! The body stream owns the working file's guard, so the file disappears once
//! the body has been sent or the client went away.

use super::temp_file::TempFile;
use crate::error::{AppError, Result};
use actix_web::body::SizedStream;
use actix_web::http::header::{self, HeaderValue};
use actix_web::HttpResponse;
use bytes::Bytes;
use futures::Stream;
use std::io::SeekFrom;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

/// Bytes inspected for content type detection
const SNIFF_LEN: u64 = 512;
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Build a streaming response for the file behind `temp_file`
pub async fn upload_response(temp_file: TempFile, file_name: &str) -> Result<HttpResponse> {
    let disposition = content_disposition(file_name)?;

    let mut file = File::open(temp_file.path())
        .await
        .map_err(|e| AppError::Transfer(format!("Failed to open thumbnail: {e}")))?;

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    (&mut file)
        .take(SNIFF_LEN)
        .read_to_end(&mut head)
        .await
        .map_err(|e| AppError::Transfer(format!("Failed to read thumbnail: {e}")))?;
    let content_type = detect_content_type(&head);

    let size = file
        .metadata()
        .await
        .map_err(|e| AppError::Transfer(format!("Failed to stat thumbnail: {e}")))?
        .len();

    file.seek(SeekFrom::Start(0))
        .await
        .map_err(|e| AppError::Transfer(format!("Failed to rewind thumbnail: {e}")))?;

    debug!(
        path = %temp_file.path().display(),
        content_type,
        size,
        "Streaming thumbnail"
    );

    let body = CleanupStream {
        inner: ReaderStream::new(file),
        temp_file,
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .insert_header((header::CONTENT_TYPE, content_type))
        .body(SizedStream::new(size, body)))
}

/// `attachment; filename=<name>`, rejected when the name cannot travel in a header
fn content_disposition(file_name: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("attachment; filename={file_name}")).map_err(|e| {
        AppError::Transfer(format!(
            "Invalid file name for Content-Disposition {file_name:?}: {e}"
        ))
    })
}

/// Sniff the content type from the leading bytes of a file
pub fn detect_content_type(head: &[u8]) -> &'static str {
    infer::get(head)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// File body that keeps the working file alive until it is dropped.
/// Field order matters: the reader closes before the file is removed.
struct CleanupStream {
    inner: ReaderStream<File>,
    temp_file: TempFile,
}

impl Stream for CleanupStream {
    type Item = std::result::Result<Bytes, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let poll = Pin::new(&mut self.inner).poll_next(cx);
        if let Poll::Ready(Some(Err(e))) = &poll {
            error!(
                path = %self.temp_file.path().display(),
                error = %e,
                "Thumbnail transfer failed"
            );
        }
        poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_jpeg() {
        let head = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(detect_content_type(&head), "image/jpeg");
    }

    #[test]
    fn test_unknown_content_falls_back() {
        assert_eq!(detect_content_type(b"plain text"), FALLBACK_CONTENT_TYPE);
        assert_eq!(detect_content_type(&[]), FALLBACK_CONTENT_TYPE);
    }

    #[actix_web::test]
    async fn test_missing_file_is_transfer_error() {
        let dir = tempfile::tempdir().unwrap();
        let guard = TempFile::new(dir.path().join("3missing.jpg"));
        let err = upload_response(guard, "missing.jpg").await.unwrap_err();
        assert!(matches!(err, AppError::Transfer(_)));
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("photo.jpg").unwrap(),
            "attachment; filename=photo.jpg"
        );
        assert!(matches!(
            content_disposition("a\u{1}b.jpg"),
            Err(AppError::Transfer(_))
        ));
        assert!(matches!(
            content_disposition("a\nb.jpg"),
            Err(AppError::Transfer(_))
        ));
    }

    #[actix_web::test]
    async fn test_unencodable_file_name_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("4a\u{1}b.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let err = upload_response(TempFile::new(&path), "a\u{1}b.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transfer(_)));
        assert!(!path.exists());
    }
}
