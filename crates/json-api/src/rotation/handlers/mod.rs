//! Rotation Handlers

pub(crate) mod reconcile;
pub(crate) mod status;
pub(crate) mod upcoming;
