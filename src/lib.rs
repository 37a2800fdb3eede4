//! Iris storefront
//!
//! Client library and console for the Iris cosmetics store. The crate wraps
//! the store's REST API behind typed services with bearer-token sessions and
//! a server-authoritative cart. After checkout it follows payment status over
//! a server-sent event stream, with polling as a fallback.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod domain;
pub mod ids;

#[cfg(test)]
mod test;
