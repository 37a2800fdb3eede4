//! Checkout and order history.

mod errors;
mod service;

pub mod models;
pub mod records;

pub use errors::*;
pub use service::*;
