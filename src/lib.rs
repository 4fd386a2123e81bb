//! Timeart
//!
//! Domain rules for the timeart storefront: which photo is featured on a given day,
//! whether a purchase request may be turned into a hosted checkout, and how a completed
//! payment becomes an order record. Nothing in this crate performs I/O.

pub mod checkout;
pub mod events;
pub mod money;
pub mod orders;
pub mod photos;
pub mod rotation;
pub mod uuids;
