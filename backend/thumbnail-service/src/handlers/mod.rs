/// HTTP handlers and route registration
///
/// Each configured [`ServiceKind`] is mounted at its configured path; kinds
/// that are not configured get no route.
pub mod thumbnail;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::config::{Config, ServiceKind};

pub use thumbnail::get_thumbnail;

/// Register the configured services plus the health probe
pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.route(
        "/health",
        web::get().to(|| async { HttpResponse::Ok().json(json!({"status": "ok"})) }),
    );

    for (kind, endpoint) in &config.services {
        match kind {
            ServiceKind::Thumbnail => {
                cfg.route(&endpoint.path, web::route().to(get_thumbnail));
            }
        }
    }
}
