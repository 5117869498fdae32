/// Business logic layer for thumbnail-service
pub mod session;
pub mod thumbnail;

pub use session::SessionRegistry;
pub use thumbnail::ThumbnailService;
