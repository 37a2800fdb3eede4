//! QR payment and the status watch.

mod errors;
mod service;
mod watch;

pub mod models;
pub mod records;

pub use errors::*;
pub use service::*;
pub use watch::*;
