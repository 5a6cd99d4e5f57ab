//! Outbound request forwarding for the bridge.
//!
//! Wraps a pooled HTTP client with the per-attempt timeout, bounded retry
//! loop, and concurrency bound that the gateway relies on. The relay only
//! ever sees authenticated traffic; signature checks happen in the gateway
//! before any outbound request is constructed.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod forwarder;
pub mod outcome;

pub use error::ProbeError;
pub use forwarder::{BackendRelay, RelaySettings};
pub use outcome::{ProbeReport, RelayOutcome};
