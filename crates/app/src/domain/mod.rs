//! Timeart Domain Concerns

pub mod checkout;
pub mod orders;
pub mod photos;
pub mod rotation;
pub mod settings;
pub mod webhooks;
