//! Rotation

pub mod errors;
pub mod service;

pub use errors::RotationServiceError;
pub use service::*;
