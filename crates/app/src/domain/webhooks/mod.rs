//! Payment Webhooks

pub mod errors;
pub mod service;
pub mod tokens;

pub use errors::WebhookServiceError;
pub use service::*;
