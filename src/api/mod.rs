//! HTTP transport

mod client;
mod errors;
mod sse;

pub use client::ApiClient;
pub use errors::ApiError;
pub use sse::{EventStream, SseEvent};
