//! Error types for the gateway crate.
//!
//! Display strings double as the caller-visible error bodies, so the exact
//! wording is part of the HTTP contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use bridge_relay::ProbeError;

/// Errors that can occur during gateway request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The request's signature did not verify (or no secret is configured).
    /// Never retried, never forwarded.
    #[error("Invalid HMAC signature")]
    InvalidSignature,

    /// Forwarding failed at the transport level after the retry budget was
    /// exhausted.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The reachability probe failed.
    #[error("{0}")]
    Probe(#[from] ProbeError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidSignature => StatusCode::UNAUTHORIZED,
            GatewayError::Backend(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Probe(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
