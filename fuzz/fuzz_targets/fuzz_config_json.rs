//! Fuzz target: configuration override parser
//!
//! Any document `LockConfig::from_json` accepts must also pass
//! `validate()`; malformed input must be rejected without panicking.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use touchlock::config::LockConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = LockConfig::from_json(json) {
        assert!(config.validate().is_ok());
    }
});
