//! Payments

pub mod events;
pub mod gateway;
pub mod secret;
pub mod signature;
pub mod stripe;

pub use gateway::*;
