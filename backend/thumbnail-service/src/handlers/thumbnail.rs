/// Thumbnail handler - HTTP endpoint for thumbnail generation
use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::Result;
use crate::services::thumbnail::parse_query;
use crate::services::ThumbnailService;

/// Fetch `url`, letterbox it to `width` x `height` and stream the result.
/// Only the query string is read, so every method is accepted.
pub async fn get_thumbnail(
    service: web::Data<ThumbnailService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let query = parse_query(req.query_string());
    service.handle(&query).await
}
