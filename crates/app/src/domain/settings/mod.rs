//! Site Settings

pub mod errors;
pub mod repository;

pub use errors::SettingsRepositoryError;
pub use repository::*;
