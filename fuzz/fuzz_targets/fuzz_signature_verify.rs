//! Fuzz target: HMAC signature verification.
//!
//! Splits arbitrary bytes into a secret, a body, and a candidate signature
//! and verifies that the verifier never panics, and that a freshly computed
//! signature always verifies against its own body.

#![no_main]

use libfuzzer_sys::fuzz_target;

use bridge_core::{SharedSecret, SignatureVerifier};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let split_a = (data[0] as usize) % data.len();
    let split_b = split_a + (data[1] as usize) % (data.len() - split_a);

    let secret = &data[..split_a];
    let body = &data[split_a..split_b];
    let candidate = String::from_utf8_lossy(&data[split_b..]);

    let verifier = SignatureVerifier::new(SharedSecret::new(secret.to_vec()));

    // Arbitrary candidate signatures must never panic.
    let _ = verifier.verify(body, &candidate);

    // Round trip must hold whenever a secret is configured.
    let own = verifier.sign(body);
    if verifier.is_configured() {
        assert!(verifier.verify(body, &own), "own signature must verify");
    } else {
        assert!(!verifier.verify(body, &own), "empty secret must never authenticate");
    }
});
