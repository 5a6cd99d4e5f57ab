//! Forwarding outcome types.

use std::time::Duration;

use hyper::body::Bytes;
use hyper::StatusCode;

/// The result of one relay invocation. Exactly one variant is produced per
/// call to [`crate::BackendRelay::forward`]; the enum is exhaustive so
/// callers must handle every case without a wildcard arm.
#[derive(Debug, Clone)]
pub enum RelayOutcome {
    /// The backend answered with a success status. Status and body are the
    /// backend's, unchanged.
    Forwarded { status: StatusCode, body: Bytes },

    /// The backend answered with a non-success status. This is a valid
    /// application-level answer, passed through verbatim and never retried.
    Upstream { status: StatusCode, body: Bytes },

    /// Every attempt exceeded the per-attempt deadline.
    TimedOut { attempts: u32 },

    /// The final attempt failed at the connection level.
    Unreachable { attempts: u32, detail: String },
}

impl RelayOutcome {
    /// Returns `true` for a success-range backend answer.
    #[must_use]
    pub fn is_forwarded(&self) -> bool {
        matches!(self, RelayOutcome::Forwarded { .. })
    }

    /// Number of outbound attempts this outcome consumed.
    ///
    /// Backend answers (success or not) terminate the attempt loop, so they
    /// report the attempt they arrived on implicitly as the last one made.
    #[must_use]
    pub fn attempts(&self) -> Option<u32> {
        match self {
            RelayOutcome::TimedOut { attempts }
            | RelayOutcome::Unreachable { attempts, .. } => Some(*attempts),
            RelayOutcome::Forwarded { .. } | RelayOutcome::Upstream { .. } => None,
        }
    }
}

/// Result of a reachability probe: the backend's status for the probe path
/// and the measured round-trip latency.
#[derive(Debug, Clone, Copy)]
pub struct ProbeReport {
    /// Status the backend returned for the probe path.
    pub status: StatusCode,
    /// Wall-clock round trip, request sent to response headers+body read.
    pub latency: Duration,
}

impl ProbeReport {
    /// Latency in milliseconds, rounded to two decimals as reported to
    /// callers.
    #[must_use]
    pub fn latency_ms(&self) -> f64 {
        (self.latency.as_secs_f64() * 100_000.0).round() / 100.0
    }
}
