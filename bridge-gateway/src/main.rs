//! Entry point for the `bridge-gateway` HTTP server.

use bridge_core::{BridgeConfig, SignatureVerifier};
use bridge_gateway::routes::{create_router, AppState};
use bridge_relay::{BackendRelay, RelaySettings};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match BridgeConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    if !config.secret.is_configured() {
        tracing::warn!("BRIDGE_HMAC_SECRET is not set; /engine will reject every request");
    }

    let verifier = SignatureVerifier::new(config.secret.clone());
    let relay = BackendRelay::new(RelaySettings::from(&config));
    let app = create_router(AppState { verifier, relay });

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        addr = %config.listen_addr,
        backend = %config.backend_url,
        timeout_ms = config.timeout.as_millis() as u64,
        retry_budget = config.retry_budget,
        "bridge-gateway listening"
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
