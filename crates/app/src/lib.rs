//! Storage, payment and orchestration services for the timeart storefront.

pub mod calendar;
pub mod context;
pub mod database;
pub mod domain;
pub mod payments;

#[cfg(test)]
mod test;
