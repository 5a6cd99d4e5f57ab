//! Core types for the bridge relay: shared-secret authentication and
//! process configuration.
//!
//! Everything here is synchronous and side-effect free; the async relay and
//! HTTP surface live in `bridge-relay` and `bridge-gateway`.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{SharedSecret, SignatureVerifier};
pub use config::BridgeConfig;
pub use error::ConfigError;
