//! Photos

pub mod errors;
pub mod repository;

pub use errors::PhotosRepositoryError;
pub use repository::*;
