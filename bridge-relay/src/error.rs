//! Error types for the relay crate.

/// Failures of the unauthenticated reachability probe.
///
/// Display strings are caller-visible: the gateway surfaces them verbatim
/// in the probe route's error body.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// The backend did not answer within the per-attempt deadline.
    #[error("backend probe timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },

    /// The probe request could not be completed at the connection level.
    #[error("backend probe failed: {detail}")]
    Unreachable { detail: String },
}
