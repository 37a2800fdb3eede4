//! Authentication

mod errors;
mod models;
mod service;
mod session;
mod tokens;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use session::*;
pub use tokens::*;
