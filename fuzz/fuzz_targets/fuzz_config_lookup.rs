//! Fuzz target: configuration parsing.
//!
//! Feeds arbitrary strings through every configuration variable and checks
//! that parsing either succeeds or fails with a typed error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

use bridge_core::BridgeConfig;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data).into_owned();
    let _ = BridgeConfig::from_lookup(|_| Some(raw.clone()));
    let _ = BridgeConfig::from_lookup(|name| {
        (name == "BRIDGE_BACKEND_URL").then(|| raw.clone())
    });
});
