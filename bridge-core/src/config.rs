//! Process configuration, read once at startup.
//!
//! All knobs come from the environment and are immutable for the life of
//! the process. Request-handling code receives the parsed config through
//! constructors; nothing re-reads the environment after init.

use std::time::Duration;

use crate::auth::SharedSecret;
use crate::error::ConfigError;

/// Environment variable names.
const ENV_BACKEND_URL: &str = "BRIDGE_BACKEND_URL";
const ENV_HMAC_SECRET: &str = "BRIDGE_HMAC_SECRET";
const ENV_TIMEOUT_MS: &str = "BRIDGE_TIMEOUT_MS";
const ENV_RETRY_BUDGET: &str = "BRIDGE_RETRY_BUDGET";
const ENV_RETRY_DELAY_MS: &str = "BRIDGE_RETRY_DELAY_MS";
const ENV_MAX_CONNECTIONS: &str = "BRIDGE_MAX_CONNECTIONS";
const ENV_LISTEN_ADDR: &str = "BRIDGE_LISTEN_ADDR";

/// Immutable bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the compute backend, without a trailing slash.
    pub backend_url: String,
    /// Shared authentication key; may be unconfigured.
    pub secret: SharedSecret,
    /// Per-attempt deadline for outbound calls.
    pub timeout: Duration,
    /// Additional attempts after the first on transport failure.
    pub retry_budget: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Upper bound on concurrent outbound attempts.
    pub max_connections: usize,
    /// Inbound listen address.
    pub listen_addr: String,
}

impl BridgeConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a numeric variable is present but
    /// malformed: a typo must fail startup, not silently fall back to a
    /// default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    /// Same contract as [`BridgeConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = lookup(ENV_BACKEND_URL)
            .unwrap_or_else(|| "http://127.0.0.1:9090".to_owned())
            .trim_end_matches('/')
            .to_owned();

        let secret = match lookup(ENV_HMAC_SECRET) {
            Some(s) if !s.is_empty() => SharedSecret::new(s.into_bytes()),
            _ => SharedSecret::unconfigured(),
        };

        let timeout_ms: u64 = parse_number(&lookup, ENV_TIMEOUT_MS, 3_000)?;
        let retry_budget: u32 = parse_number(&lookup, ENV_RETRY_BUDGET, 2)?;
        let retry_delay_ms: u64 = parse_number(&lookup, ENV_RETRY_DELAY_MS, 500)?;

        let max_connections: usize = parse_number(&lookup, ENV_MAX_CONNECTIONS, 10)?;
        if max_connections == 0 {
            return Err(ConfigError::ZeroBound { name: ENV_MAX_CONNECTIONS });
        }

        let listen_addr =
            lookup(ENV_LISTEN_ADDR).unwrap_or_else(|| "127.0.0.1:8080".to_owned());

        Ok(Self {
            backend_url,
            secret,
            timeout: Duration::from_millis(timeout_ms),
            retry_budget,
            retry_delay: Duration::from_millis(retry_delay_ms),
            max_connections,
            listen_addr,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
            name,
            value: raw,
            expected: "non-negative integer",
        }),
        None => Ok(default),
    }
}
