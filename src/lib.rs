//! # Subscription Gateway Library
//!
//! Authenticated HTTP gateway in front of a subscription-management REST
//! API. Keeps one bearer token per process, renews it ahead of its assumed
//! expiry, and retries a call once when upstream rejects the token.
//!
//! Modules:
//! - `config`: YAML configuration, env expansion and validation
//! - `cache`: token cache with serialized logins
//! - `resilience`: single re-authentication retry
//! - `upstream`: subscription API and payment-means clients
//! - `routes`: inbound gateway surface
//! - `server`: app state, API key check, serving and shutdown

pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod models;
pub mod resilience;
pub mod routes;
pub mod server;
pub mod upstream;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::types::ServiceConfig;
pub use crate::error::GatewayError;
