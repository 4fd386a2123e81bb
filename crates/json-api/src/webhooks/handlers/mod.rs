//! Webhook Handlers

pub(crate) mod receive;
