//! End-to-end tests: gateway router in front of a real local fake backend.
//!
//! The fake backend counts hits so the tests can assert not only what the
//! caller sees but whether any outbound call happened at all.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use bridge_core::{SharedSecret, SignatureVerifier};
use bridge_gateway::routes::{create_router, AppState, SIGNATURE_HEADER};
use bridge_relay::{BackendRelay, RelaySettings};

const SECRET: &[u8] = b"integration-secret";

struct Harness {
    app: Router,
    verifier: SignatureVerifier,
    backend_hits: Arc<AtomicUsize>,
}

/// Start `backend` on an ephemeral port and build a gateway router in front
/// of it.
async fn harness(backend: Router) -> Harness {
    let backend_hits = Arc::new(AtomicUsize::new(0));
    let counted = backend.layer(axum::middleware::from_fn({
        let hits = backend_hits.clone();
        move |req: Request<Body>, next: axum::middleware::Next| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                next.run(req).await
            }
        }
    }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, counted).await;
    });

    let verifier = SignatureVerifier::new(SharedSecret::new(SECRET.to_vec()));
    let relay = BackendRelay::new(RelaySettings {
        backend_url: format!("http://{addr}"),
        timeout: Duration::from_secs(2),
        retry_budget: 1,
        retry_delay: Duration::ZERO,
        max_connections: 10,
    });
    let app = create_router(AppState { verifier: verifier.clone(), relay });

    Harness { app, verifier, backend_hits }
}

fn engine_request(verifier: &SignatureVerifier, body: &str, valid: bool) -> Request<Body> {
    let signature = if valid {
        verifier.sign(body.as_bytes())
    } else {
        "0".repeat(64)
    };
    Request::builder()
        .method("POST")
        .uri("/engine")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body.to_owned()))
        .expect("build request")
}

async fn read_body(resp: Response) -> Bytes {
    axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .expect("read body")
}

#[tokio::test]
async fn valid_signature_passes_backend_answer_through() {
    let backend = Router::new()
        .route("/engine", post(|| async { (StatusCode::OK, r#"{"ok": true}"#) }));
    let h = harness(backend).await;

    let resp = h
        .app
        .oneshot(engine_request(&h.verifier, r#"{"workflow": "deploy"}"#, true))
        .await
        .expect("gateway response");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&read_body(resp).await[..], br#"{"ok": true}"#);
    assert_eq!(h.backend_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_signature_never_produces_an_outbound_call() {
    let backend = Router::new()
        .route("/engine", post(|| async { (StatusCode::OK, r#"{"ok": true}"#) }));
    let h = harness(backend).await;

    let resp = h
        .app
        .oneshot(engine_request(&h.verifier, r#"{"workflow": "deploy"}"#, false))
        .await
        .expect("gateway response");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&read_body(resp).await).expect("json body");
    assert_eq!(body["error"], "Invalid HMAC signature");
    assert_eq!(
        h.backend_hits.load(Ordering::SeqCst),
        0,
        "authentication must precede any network call"
    );
}

#[tokio::test]
async fn backend_error_status_passes_through_unchanged() {
    let backend = Router::new().route(
        "/engine",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, r#"{"detail": "x"}"#) }),
    );
    let h = harness(backend).await;

    let resp = h
        .app
        .oneshot(engine_request(&h.verifier, "{}", true))
        .await
        .expect("gateway response");

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&read_body(resp).await[..], br#"{"detail": "x"}"#);
    assert_eq!(
        h.backend_hits.load(Ordering::SeqCst),
        1,
        "a backend-returned status must not be retried"
    );
}

#[tokio::test]
async fn unreachable_backend_surfaces_as_502() {
    // Take an ephemeral port and free it so nothing listens there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let verifier = SignatureVerifier::new(SharedSecret::new(SECRET.to_vec()));
    let relay = BackendRelay::new(RelaySettings {
        backend_url: format!("http://{addr}"),
        timeout: Duration::from_secs(1),
        retry_budget: 1,
        retry_delay: Duration::ZERO,
        max_connections: 10,
    });
    let app = create_router(AppState { verifier: verifier.clone(), relay });

    let resp = app
        .oneshot(engine_request(&verifier, "{}", true))
        .await
        .expect("gateway response");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_slice(&read_body(resp).await).expect("json body");
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.starts_with("Backend error: "), "unexpected body: {message}");
}

#[tokio::test]
async fn silent_backend_exhausts_budget_and_surfaces_as_502() {
    // A backend that accepts connections but never answers: every attempt
    // must hit the per-attempt deadline, and the caller sees a 502 naming
    // the full attempt count.
    let accepts = Arc::new(AtomicUsize::new(0));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn({
        let accepts = accepts.clone();
        async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                accepts.fetch_add(1, Ordering::SeqCst);
                held.push(socket);
            }
        }
    });

    let verifier = SignatureVerifier::new(SharedSecret::new(SECRET.to_vec()));
    let relay = BackendRelay::new(RelaySettings {
        backend_url: format!("http://{addr}"),
        timeout: Duration::from_millis(100),
        retry_budget: 2,
        retry_delay: Duration::ZERO,
        max_connections: 10,
    });
    let app = create_router(AppState { verifier: verifier.clone(), relay });

    let resp = app
        .oneshot(engine_request(&verifier, "{}", true))
        .await
        .expect("gateway response");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_slice(&read_body(resp).await).expect("json body");
    assert_eq!(body["error"], "Backend error: backend timed out after 3 attempts");
    assert_eq!(
        accepts.load(Ordering::SeqCst),
        3,
        "one connection per attempt, full budget consumed"
    );
}

#[tokio::test]
async fn probe_reports_backend_reachability() {
    let backend = Router::new()
        .route("/status", get(|| async { (StatusCode::OK, r#"{"status": "operational"}"#) }));
    let h = harness(backend).await;

    let req = Request::builder()
        .uri("/test-render")
        .body(Body::empty())
        .expect("build request");
    let resp = h.app.oneshot(req).await.expect("gateway response");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&read_body(resp).await).expect("json body");
    assert_eq!(body["status"], "OK");
    assert_eq!(body["backend_status"], 200);
    assert_eq!(body["hmac_configured"], true);
    assert!(body["latency_ms"].is_number());
}

#[tokio::test]
async fn concurrent_engine_requests_receive_their_own_answers() {
    // Echo backend: each caller should get its own body back.
    let backend = Router::new().route("/engine", post(|body: Bytes| async move { body }));
    let h = harness(backend).await;

    let mut tasks = Vec::new();
    for i in 0..8u32 {
        let app = h.app.clone();
        let verifier = h.verifier.clone();
        tasks.push(tokio::spawn(async move {
            let body = format!(r#"{{"request": {i}}}"#);
            let resp = app
                .oneshot(engine_request(&verifier, &body, true))
                .await
                .expect("gateway response");
            assert_eq!(resp.status(), StatusCode::OK);
            let echoed = read_body(resp).await;
            assert_eq!(&echoed[..], body.as_bytes(), "responses must not cross requests");
        }));
    }
    for task in tasks {
        task.await.expect("task must not panic");
    }
}
