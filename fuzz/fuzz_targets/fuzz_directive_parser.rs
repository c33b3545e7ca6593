//! Fuzz target: lockout directive scanner
//!
//! Feeds arbitrary authority replies to `parse_directive` and verifies:
//! - No panics on any UTF-8 input (multibyte boundaries included)
//! - A directive is only produced when the marker is present
//!
//! cargo fuzz run fuzz_directive_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use touchlock::authority::directive::{LOCKOUT_MARKER, parse_directive};

fuzz_target!(|data: &[u8]| {
    let Ok(reply) = core::str::from_utf8(data) else {
        return;
    };
    if parse_directive(reply).is_some() {
        assert!(reply.contains(LOCKOUT_MARKER));
    }
});
