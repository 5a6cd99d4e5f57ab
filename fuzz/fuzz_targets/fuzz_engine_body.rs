//! Fuzz target: JSON parsing of inbound request bodies.
//!
//! The gateway parses caller-supplied JSON leniently; arbitrary byte
//! sequences must never cause panics or unbounded resource consumption.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are expected and fine; we only care that this never panics.
    let _ = serde_json::from_slice::<serde_json::Value>(data);
});
