//! Static responder siblings of the relay routes.
//!
//! These endpoints answer with fixed-shape JSON: liveness and metadata
//! probes, the ingestion acknowledgers, and the pipeline stages that
//! currently return example payloads. None of them touch the relay or the
//! backend; they share the process and nothing else.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::routes::AppState;

const SERVICE: &str = "bridge-gateway";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Routes for every static responder. State is only used for descriptive
/// fields (backend URL, whether a secret is configured).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/test-basic", get(test_basic))
        .route("/ingest/min", post(ingest_min))
        .route("/ingest/full", post(ingest_full))
        .route("/data/collect", post(data_collect))
        .route("/fastturf/run", post(fastturf_run))
        .route("/data/store", post(data_store))
        .route("/analysis/psi", post(analysis_psi))
        .route("/results/top3", get(results_top3))
        .route("/openapi.json", get(openapi))
        .route("/manifest.json", get(manifest))
}

fn now_ts() -> i64 {
    Utc::now().timestamp()
}

/// Parse a JSON body leniently; anything unparsable counts as absent.
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// An absent or contentless ingest payload: null, empty object or array,
/// empty string, `false`, or zero.
fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE,
        "version": VERSION,
        "endpoints": [
            "/health", "/status", "/test-basic", "/test-render", "/engine",
            "/ingest/min", "/ingest/full", "/data/collect", "/fastturf/run",
            "/data/store", "/analysis/psi", "/results/top3",
            "/openapi.json", "/manifest.json",
        ],
    }))
}

/// `GET /health`: liveness probe.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE,
        "version": VERSION,
        "timestamp": now_ts(),
    }))
}

/// `GET /status`: descriptive status, including relay configuration facts.
async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "operational",
        "service": SERVICE,
        "version": VERSION,
        "backend": state.relay.backend_url(),
        "hmac_configured": state.verifier.is_configured(),
        "timestamp": now_ts(),
    }))
}

async fn test_basic(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "Bridge OK",
        "service": SERVICE,
        "backend": state.relay.backend_url(),
    }))
}

async fn ingest_min(body: Bytes) -> impl IntoResponse {
    let data = parse_body(&body);
    if is_empty_payload(&data) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "No data provided"})));
    }
    let records = data["records"].as_array().map_or(0, Vec::len);
    tracing::info!(records, mode = "minimal", "ingest acknowledged");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ingested",
            "mode": "minimal",
            "records": records,
            "timestamp": now_ts(),
        })),
    )
}

async fn ingest_full(body: Bytes) -> impl IntoResponse {
    let data = parse_body(&body);
    if is_empty_payload(&data) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "No data provided"})));
    }
    let records = data["records"].as_array().map_or(0, Vec::len);
    let metadata = data.get("metadata").cloned().unwrap_or_else(|| json!({}));
    tracing::info!(records, mode = "full", "ingest acknowledged");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ingested",
            "mode": "full",
            "records": records,
            "metadata": metadata,
            "timestamp": now_ts(),
        })),
    )
}

// ── Pipeline stages (fixed example payloads) ─────────────────────────────────

async fn data_collect(body: Bytes) -> Json<Value> {
    let data = parse_body(&body);
    let source = data["source"].as_str().unwrap_or("unknown");
    let records = data["records"].as_array().map_or(0, Vec::len);
    Json(json!({
        "arc": "ARC1",
        "status": "collected",
        "source": source,
        "records_count": records,
        "timestamp": now_ts(),
    }))
}

async fn fastturf_run(body: Bytes) -> Json<Value> {
    let data = parse_body(&body);
    let race_id = data["race_id"].as_str().unwrap_or("unknown");
    Json(json!({
        "arc": "ARC2",
        "status": "computed",
        "race_id": race_id,
        "engine": "fastturf",
        "execution_time_ms": 150,
        "predictions": [
            {"position": 1, "horse": "Example-1", "confidence": 0.85},
            {"position": 2, "horse": "Example-2", "confidence": 0.72},
            {"position": 3, "horse": "Example-3", "confidence": 0.68},
        ],
        "timestamp": now_ts(),
    }))
}

async fn data_store(body: Bytes) -> Json<Value> {
    let data = parse_body(&body);
    let dataset = data["dataset"].as_str().unwrap_or("unknown");
    let records = data["records"].as_array().map_or(0, Vec::len);
    Json(json!({
        "arc": "ARC3",
        "status": "stored",
        "dataset": dataset,
        "records_stored": records,
        "storage": "cloud-storage",
        "timestamp": now_ts(),
    }))
}

async fn analysis_psi(body: Bytes) -> Json<Value> {
    let data = parse_body(&body);
    let analysis_type = data["type"].as_str().unwrap_or("psi");
    Json(json!({
        "arc": "ARC4",
        "status": "analyzed",
        "analysis_type": analysis_type,
        "model": "deep-learning-psi-v2",
        "insights": {
            "trend": "positive",
            "risk_level": "medium",
            "confidence": 0.78,
            "key_factors": ["form", "track_condition", "jockey_experience"],
        },
        "timestamp": now_ts(),
    }))
}

#[derive(Debug, Deserialize)]
struct ResultsQuery {
    race_id: Option<String>,
}

async fn results_top3(Query(query): Query<ResultsQuery>) -> Json<Value> {
    let race_id = query.race_id.as_deref().unwrap_or("latest");
    Json(json!({
        "arc": "ARC5",
        "status": "success",
        "race_id": race_id,
        "top3": [
            {"position": 1, "horse": "Champion-Star", "number": 7, "odds": "3/1", "confidence": 0.89},
            {"position": 2, "horse": "Thunder-Bolt", "number": 3, "odds": "5/1", "confidence": 0.82},
            {"position": 3, "horse": "Swift-Runner", "number": 12, "odds": "7/1", "confidence": 0.76},
        ],
        "timestamp": now_ts(),
    }))
}

async fn openapi() -> Json<Value> {
    Json(json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Bridge Gateway API",
            "version": VERSION,
            "description": "Authenticated relay in front of the compute backend",
        },
        "paths": {
            "/health": {"get": {"summary": "Health check", "responses": {"200": {"description": "OK"}}}},
            "/status": {"get": {"summary": "Status check", "responses": {"200": {"description": "OK"}}}},
            "/test-render": {"get": {"summary": "Backend reachability probe", "responses": {"200": {"description": "OK"}, "500": {"description": "Probe failed"}}}},
            "/engine": {"post": {
                "summary": "Forward a workflow to the backend (HMAC)",
                "security": [{"hmacAuth": []}],
                "requestBody": {"required": true, "content": {"application/json": {"schema": {"type": "object"}}}},
                "responses": {
                    "200": {"description": "Backend answer"},
                    "401": {"description": "Invalid HMAC"},
                    "502": {"description": "Backend error"},
                },
            }},
        },
        "components": {
            "securitySchemes": {
                "hmacAuth": {"type": "apiKey", "in": "header", "name": "X-HMAC-Signature"},
            },
        },
    }))
}

async fn manifest() -> Json<Value> {
    Json(json!({
        "schema_version": "v1",
        "name_for_human": "Bridge Gateway",
        "name_for_model": "bridge_gateway",
        "description_for_human": "Relay for JSON workflows, HMAC-authenticated on /engine",
        "description_for_model": "API relaying JSON workflows to the compute backend. HMAC on /engine.",
        "auth": {"type": "none"},
        "api": {"type": "openapi", "url": "/openapi.json"},
    }))
}
