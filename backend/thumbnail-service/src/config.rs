/// Configuration management for thumbnail-service
///
/// Layered with the `config` crate: built-in defaults, an optional YAML file,
/// `THUMBNAIL__*` environment variables and finally the bare `PORT` variable.
/// Routes are mounted only for the services the YAML file lists.
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "THUMBNAIL";
const CONFIG_PATH_VAR: &str = "THUMBNAIL_CONFIG";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub services: HashMap<ServiceKind, ServiceEndpoint>,
    pub thumbnail: ThumbnailSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the per-request working files
    pub temp_directory: PathBuf,
}

/// Services this binary knows how to mount. Only the ones present in
/// `services` get a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Thumbnail,
}

impl ServiceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Thumbnail => "thumbnail",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceEndpoint {
    pub path: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ThumbnailSettings {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Largest accepted width or height
    pub max_dimension: u32,
    pub fetch_timeout_secs: u64,
    pub processing_timeout_secs: u64,
}

impl ThumbnailSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.processing_timeout_secs)
    }
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            max_dimension: 4096,
            fetch_timeout_secs: 30,
            processing_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration, taking the file path from the first CLI argument
    /// or `THUMBNAIL_CONFIG`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_PATH_VAR).ok())
            .map(PathBuf::from);

        Self::load(path.as_deref())
    }

    /// Load configuration from defaults, an optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ThumbnailSettings::default();
        let temp_directory = std::env::temp_dir();

        let mut builder = config::Config::builder()
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8080)?
            .set_default(
                "storage.temp_directory",
                temp_directory.to_string_lossy().to_string(),
            )?
            .set_default("thumbnail.jpeg_quality", defaults.jpeg_quality as i64)?
            .set_default("thumbnail.max_dimension", defaults.max_dimension as i64)?
            .set_default(
                "thumbnail.fetch_timeout_secs",
                defaults.fetch_timeout_secs as i64,
            )?
            .set_default(
                "thumbnail.processing_timeout_secs",
                defaults.processing_timeout_secs as i64,
            )?;

        if let Some(path) = path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "configuration file {} does not exist",
                    path.display()
                )));
            }
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        } else {
            // A config file lists its services explicitly; without one, mount the thumbnail endpoint.
            builder = builder.set_default("services.thumbnail.path", "/thumbnail")?;
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("app.port", std::env::var("PORT").ok())?;

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.thumbnail.jpeg_quality) {
            return Err(AppError::Config(format!(
                "thumbnail.jpeg_quality must be within 1..=100, got {}",
                self.thumbnail.jpeg_quality
            )));
        }

        if self.thumbnail.max_dimension == 0 {
            return Err(AppError::Config(
                "thumbnail.max_dimension must be positive".to_string(),
            ));
        }

        for (kind, endpoint) in &self.services {
            if !endpoint.path.starts_with('/') {
                return Err(AppError::Config(format!(
                    "service {} path must start with '/', got {:?}",
                    kind.name(),
                    endpoint.path
                )));
            }
        }

        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
