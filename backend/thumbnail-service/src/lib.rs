//! Thumbnail Service
//!
//! Single-endpoint HTTP service that fetches a remote JPEG and returns a
//! letterboxed thumbnail of the requested size.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
