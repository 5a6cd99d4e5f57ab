//! The outbound forwarding client.
//!
//! One [`BackendRelay`] is built at startup from the immutable process
//! config and shared across all inbound requests. Each forward call runs a
//! bounded attempt loop: per-attempt wall-clock timeout, fixed delay
//! between attempts, retries only on transport failures. A semaphore caps
//! concurrent outbound attempts; saturated callers queue for a permit
//! rather than failing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::sync::Semaphore;
use uuid::Uuid;

use bridge_core::BridgeConfig;

use crate::error::ProbeError;
use crate::outcome::{ProbeReport, RelayOutcome};

/// Idle connections kept per backend host.
const POOL_MAX_IDLE_PER_HOST: usize = 5;

/// Immutable forwarding knobs, extracted from [`BridgeConfig`].
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Backend base URL without a trailing slash.
    pub backend_url: String,
    /// Per-attempt deadline, covering connect, send, and body read.
    pub timeout: Duration,
    /// Additional attempts after the first on transport failure.
    pub retry_budget: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Upper bound on concurrent outbound attempts.
    pub max_connections: usize,
}

impl From<&BridgeConfig> for RelaySettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            backend_url: config.backend_url.clone(),
            timeout: config.timeout,
            retry_budget: config.retry_budget,
            retry_delay: config.retry_delay,
            max_connections: config.max_connections,
        }
    }
}

/// A transport-level attempt failure. Backend-returned statuses are not
/// failures and never reach this type.
#[derive(Debug, thiserror::Error)]
enum AttemptFailure {
    #[error("attempt deadline exceeded")]
    TimedOut,

    #[error("{0}")]
    Connect(String),
}

/// Pooled HTTP client for the compute backend.
///
/// Cheap to clone; clones share the connection pool and the concurrency
/// permits.
#[derive(Debug, Clone)]
pub struct BackendRelay {
    client: Client<HttpConnector, Full<Bytes>>,
    settings: RelaySettings,
    permits: Arc<Semaphore>,
}

impl BackendRelay {
    /// Builds the relay client from forwarding settings.
    #[must_use]
    pub fn new(settings: RelaySettings) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .build(HttpConnector::new());
        let permits = Arc::new(Semaphore::new(settings.max_connections));
        Self { client, settings, permits }
    }

    /// Returns the configured backend base URL.
    #[must_use]
    pub fn backend_url(&self) -> &str {
        &self.settings.backend_url
    }

    /// Forwards `body` to `backend_url + path` and reports the outcome.
    ///
    /// The body is sent as `application/json`. Transport failures are
    /// retried up to the budget with a fixed delay; attempts are strictly
    /// sequential. A backend answer of any status ends the loop immediately
    /// and passes through unchanged.
    pub async fn forward(&self, method: Method, path: &str, body: Bytes) -> RelayOutcome {
        let request_id = Uuid::new_v4();
        let target = format!("{}{}", self.settings.backend_url, path);
        let uri: Uri = match target.parse() {
            Ok(uri) => uri,
            Err(e) => {
                return RelayOutcome::Unreachable {
                    attempts: 0,
                    detail: format!("invalid backend target {target}: {e}"),
                }
            }
        };

        let max_attempts = self.settings.retry_budget.saturating_add(1);
        let mut last_failure = AttemptFailure::Connect("no attempt made".to_owned());

        for attempt in 1..=max_attempts {
            let start = Instant::now();
            match self.attempt(method.clone(), &uri, body.clone()).await {
                Ok((status, resp_body)) => {
                    tracing::info!(
                        %request_id,
                        path,
                        attempt,
                        status = status.as_u16(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "backend answered"
                    );
                    return if status.is_success() {
                        RelayOutcome::Forwarded { status, body: resp_body }
                    } else {
                        RelayOutcome::Upstream { status, body: resp_body }
                    };
                }
                Err(failure) => {
                    tracing::warn!(
                        %request_id,
                        path,
                        attempt,
                        max_attempts,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        error = %failure,
                        "forward attempt failed"
                    );
                    last_failure = failure;
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.settings.retry_delay).await;
            }
        }

        match last_failure {
            AttemptFailure::TimedOut => RelayOutcome::TimedOut { attempts: max_attempts },
            AttemptFailure::Connect(detail) => {
                RelayOutcome::Unreachable { attempts: max_attempts, detail }
            }
        }
    }

    /// One unauthenticated reachability probe: a single GET against
    /// `backend_url + path`, measuring round-trip latency.
    ///
    /// The probe never retries and never mutates state. The per-attempt
    /// timeout applies; a hung backend reports [`ProbeError::TimedOut`]
    /// instead of blocking the caller.
    ///
    /// # Errors
    /// [`ProbeError::TimedOut`] on deadline, [`ProbeError::Unreachable`] on
    /// connection failure.
    pub async fn probe(&self, path: &str) -> Result<ProbeReport, ProbeError> {
        let target = format!("{}{}", self.settings.backend_url, path);
        let uri: Uri = target.parse().map_err(|e| ProbeError::Unreachable {
            detail: format!("invalid backend target {target}: {e}"),
        })?;

        let start = Instant::now();
        match self.attempt(Method::GET, &uri, Bytes::new()).await {
            Ok((status, _body)) => Ok(ProbeReport { status, latency: start.elapsed() }),
            Err(AttemptFailure::TimedOut) => Err(ProbeError::TimedOut {
                timeout_ms: self.settings.timeout.as_millis() as u64,
            }),
            Err(AttemptFailure::Connect(detail)) => Err(ProbeError::Unreachable { detail }),
        }
    }

    /// One bounded attempt: acquire a permit, send, read the full body.
    ///
    /// The permit is held for the duration of the attempt and released
    /// before any inter-retry sleep, so a retrying request never starves
    /// unrelated traffic.
    async fn attempt(
        &self,
        method: Method,
        uri: &Uri,
        body: Bytes,
    ) -> Result<(StatusCode, Bytes), AttemptFailure> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AttemptFailure::Connect("outbound permits closed".to_owned()))?;

        let request = Request::builder()
            .method(method)
            .uri(uri.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(body))
            .map_err(|e| AttemptFailure::Connect(format!("build request: {e}")))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| AttemptFailure::Connect(e.to_string()))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| AttemptFailure::Connect(format!("read response body: {e}")))?
                .to_bytes();
            Ok((status, body))
        };

        match tokio::time::timeout(self.settings.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(AttemptFailure::TimedOut),
        }
    }
}
