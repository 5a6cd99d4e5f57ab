//! Axum route handlers for the bridge gateway.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use bridge_core::SignatureVerifier;
use bridge_relay::{BackendRelay, RelayOutcome};

use crate::error::GatewayError;
use crate::stubs;

/// Header carrying the hex-encoded HMAC-SHA256 digest of the raw body.
pub const SIGNATURE_HEADER: &str = "x-hmac-signature";

/// Immutable per-process state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub verifier: SignatureVerifier,
    pub relay: BackendRelay,
}

/// Build the application router with the given state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/engine", post(engine))
        .route("/test-render", get(test_render))
        .merge(stubs::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// `POST /engine`: the authenticated relay route.
///
/// Verifies the `X-HMAC-Signature` header against the exact raw body bytes
/// before anything else; no outbound traffic is ever initiated for a
/// request that fails verification. On success the body is forwarded to
/// the backend's `/engine` and the backend's status and body pass through
/// verbatim, whatever the status.
///
/// # Errors
/// [`GatewayError::InvalidSignature`] (401) on verification failure,
/// [`GatewayError::Backend`] (502) when the backend stays unreachable or
/// silent through the whole retry budget.
pub async fn engine(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !state.verifier.verify(&body, signature) {
        tracing::warn!(route = "/engine", "rejecting request: signature verification failed");
        return Err(GatewayError::InvalidSignature);
    }

    match state.relay.forward(Method::POST, "/engine", body).await {
        RelayOutcome::Forwarded { status, body } | RelayOutcome::Upstream { status, body } => {
            passthrough(status, body)
        }
        RelayOutcome::TimedOut { attempts } => Err(GatewayError::Backend(format!(
            "backend timed out after {attempts} attempts"
        ))),
        RelayOutcome::Unreachable { detail, .. } => Err(GatewayError::Backend(detail)),
    }
}

/// `GET /test-render`: unauthenticated backend reachability probe.
///
/// Performs a single timed GET against the backend's `/status` and reports
/// the round-trip latency. Informational only; nothing is mutated.
///
/// # Errors
/// [`GatewayError::Probe`] (500) with the probe failure detail.
pub async fn test_render(
    State(state): State<AppState>,
) -> Result<Json<Value>, GatewayError> {
    let report = state.relay.probe("/status").await?;
    tracing::info!(
        backend_status = report.status.as_u16(),
        latency_ms = report.latency_ms(),
        "backend probe complete"
    );
    Ok(Json(json!({
        "status": "OK",
        "backend_status": report.status.as_u16(),
        "latency_ms": report.latency_ms(),
        "hmac_configured": state.verifier.is_configured(),
    })))
}

/// Re-emit a backend answer unchanged: its status code, its body bytes.
fn passthrough(status: StatusCode, body: Bytes) -> Result<Response, GatewayError> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .map_err(|e| GatewayError::Backend(format!("assemble response: {e}")))
}
