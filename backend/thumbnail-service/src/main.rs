/// Thumbnail Service - HTTP Server
///
/// Fetches remote JPEG images and streams back letterboxed thumbnails.
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use thumbnail_service::handlers;
use thumbnail_service::services::thumbnail::HttpImageFetcher;
use thumbnail_service::services::{SessionRegistry, ThumbnailService};
use thumbnail_service::Config;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thumbnail_service=info,actix_web=info".into()),
        )
        .init();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{e}")))?;

    std::fs::create_dir_all(&config.storage.temp_directory)?;

    let fetcher = HttpImageFetcher::new(config.thumbnail.fetch_timeout())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{e}")))?;
    let registry = Arc::new(SessionRegistry::new(config.storage.temp_directory.clone()));
    let thumbnail_service =
        ThumbnailService::new(registry, Arc::new(fetcher), config.thumbnail.clone());

    if config.services.is_empty() {
        warn!("No services configured, only /health will be served");
    }
    for (kind, endpoint) in &config.services {
        info!(service = kind.name(), path = %endpoint.path, "Service registered");
    }

    let bind_address = config.listen_address();
    info!(
        address = %bind_address,
        temp_directory = %config.storage.temp_directory.display(),
        "Thumbnail service starting"
    );

    HttpServer::new(move || {
        let config = config.clone();
        App::new()
            .app_data(web::Data::new(thumbnail_service.clone()))
            .wrap(actix_middleware::Logger::default())
            .configure(move |cfg| handlers::configure(cfg, &config))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    info!("Thumbnail service shutting down");
    Ok(())
}
