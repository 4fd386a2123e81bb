//! Photo Handlers

pub(crate) mod today;
