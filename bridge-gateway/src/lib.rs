//! HTTP surface for the bridge relay.
//!
//! Exposes the HMAC-authenticated `/engine` forwarding route, the backend
//! reachability probe, and the static responder siblings, in front of the
//! compute backend configured at startup.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod routes;
pub mod stubs;
