//! Server-authoritative cart.

mod errors;
mod service;
mod store;

pub mod models;
pub mod records;

pub use errors::*;
pub use service::*;
pub use store::*;
