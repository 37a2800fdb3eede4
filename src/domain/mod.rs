//! Storefront domain services.

pub mod carts;
pub mod catalog;
pub mod orders;
pub mod payments;

pub(crate) mod wire;
