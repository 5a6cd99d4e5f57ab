//! Error types for the `bridge-core` crate.

/// Errors produced while reading startup configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("invalid value for {name}: '{value}' is not a valid {expected}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The outbound concurrency bound must be at least 1.
    #[error("invalid value for {name}: must be at least 1")]
    ZeroBound { name: &'static str },
}
