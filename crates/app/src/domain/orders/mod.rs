//! Orders

pub mod errors;
pub mod repository;

pub use errors::OrdersRepositoryError;
pub use repository::*;
