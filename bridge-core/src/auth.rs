//! HMAC-SHA256 request authentication.
//!
//! Inbound requests carry a hex-encoded HMAC-SHA256 digest of the raw body,
//! computed with a secret shared between the caller and this process. The
//! verifier recomputes the digest over the exact body bytes and compares it
//! against the supplied value in constant time.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The shared authentication key, read once at startup.
///
/// An empty secret is a valid (but insecure) state: verification fails
/// unconditionally until a secret is configured.
#[derive(Clone, Default)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    /// Wraps raw secret bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// An absent secret; every verification against it fails.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if a non-empty secret is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.0.is_empty()
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// The key must never leak through debug formatting or error chains.
impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            write!(f, "SharedSecret(<{} bytes>)", self.0.len())
        } else {
            write!(f, "SharedSecret(<unconfigured>)")
        }
    }
}

/// Verifies request signatures against the process-wide [`SharedSecret`].
///
/// Pure over its inputs plus the immutable secret; safe to share across
/// request handlers.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: SharedSecret,
}

impl SignatureVerifier {
    /// Creates a verifier over the given secret.
    #[must_use]
    pub fn new(secret: SharedSecret) -> Self {
        Self { secret }
    }

    /// Returns `true` if a secret is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.secret.is_configured()
    }

    /// Verifies `signature` (hex-encoded HMAC-SHA256) against the exact raw
    /// body bytes.
    ///
    /// Returns `false` for an unconfigured secret, a malformed signature, or
    /// a digest mismatch. Signatures are lowercase hex, as emitted by
    /// [`SignatureVerifier::sign`]; an uppercase rendering of the correct
    /// digest does not verify. The digest comparison goes through
    /// [`Mac::verify_slice`], which is constant-time; the result does not
    /// leak where the first mismatched byte occurs.
    #[must_use]
    pub fn verify(&self, raw_body: &[u8], signature: &str) -> bool {
        if !self.secret.is_configured() {
            // Distinct from a mismatch: the operator forgot to set a secret.
            tracing::warn!("shared secret not configured, rejecting signed request");
            return false;
        }

        // Lowercase hex only; the case check is over the public signature
        // string, not the secret.
        if signature.bytes().any(|b| b.is_ascii_uppercase()) {
            return false;
        }
        let Ok(supplied) = hex::decode(signature) else {
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(self.secret.as_bytes()) else {
            // HMAC accepts keys of any length; unreachable in practice.
            return false;
        };
        mac.update(raw_body);
        mac.verify_slice(&supplied).is_ok()
    }

    /// Computes the hex-encoded HMAC-SHA256 digest of `raw_body`.
    ///
    /// Counterpart to [`SignatureVerifier::verify`], used by client tooling
    /// and tests. Always 64 lowercase hex characters.
    ///
    /// # Panics
    /// Never panics: HMAC accepts keys of any length, including empty.
    #[must_use]
    pub fn sign(&self, raw_body: &[u8]) -> String {
        #[expect(clippy::expect_used, reason = "HMAC-SHA256 accepts any key length")]
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC key of any length is valid");
        mac.update(raw_body);
        hex::encode(mac.finalize().into_bytes())
    }
}
