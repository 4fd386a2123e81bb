//! Photos

mod handlers;
pub(crate) mod models;

pub(crate) use handlers::*;
pub(crate) use models::PhotoResponse;
