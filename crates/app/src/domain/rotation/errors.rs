//! Rotation service errors.

use thiserror::Error;

use crate::domain::{photos::PhotosRepositoryError, settings::SettingsRepositoryError};

#[derive(Debug, Error)]
pub enum RotationServiceError {
    #[error("failed to read the photo pool")]
    Photos(#[from] PhotosRepositoryError),

    #[error("failed to access the featured photo pointer")]
    Settings(#[from] SettingsRepositoryError),
}
