//! Products, variants, and categories

mod errors;
pub mod models;
pub mod records;
mod resolve;
mod service;

pub use errors::*;
pub use resolve::*;
pub use service::*;
