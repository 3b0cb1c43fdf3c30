pub mod catalog_service;
pub mod media_service;

pub use catalog_service::CatalogService;
pub use media_service::{MediaService, UploadedImage};
