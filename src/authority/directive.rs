//! Lockout directive scanner.
//!
//! The authority's reply is unstructured text meant for humans, e.g.
//!
//! ```text
//! Received: Status=attempt, Code=9999 at 12:00:03. Code 9999 has been LOCKED OUT for 60.0 seconds
//! Access denied: LOCKED OUT for 42 seconds due to repeated failures.
//! ```
//!
//! The scanner looks for [`LOCKOUT_MARKER`], then for the next
//! [`DURATION_UNIT`] after it, and parses whatever sits in between.  It
//! never panics and never guesses: every anomaly means "no directive".

/// Phrase that introduces a lockout duration.
pub const LOCKOUT_MARKER: &str = "LOCKED OUT for";

/// Unit word that terminates the duration.
pub const DURATION_UNIT: &str = "seconds";

/// A lockout instruction extracted from an authority reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutDirective {
    pub duration_secs: u32,
}

/// Extract a lockout directive from `reply`, if it carries one.
pub fn parse_directive(reply: &str) -> Option<LockoutDirective> {
    let marker_at = reply.find(LOCKOUT_MARKER)?;
    let payload_start = marker_at + LOCKOUT_MARKER.len();

    // Right boundary: first unit word after the marker.
    let rest = &reply[payload_start..];
    let payload_len = rest.find(DURATION_UNIT)?;

    parse_seconds(rest[..payload_len].trim()).map(|duration_secs| LockoutDirective { duration_secs })
}

/// Parse `"42"` or `"60.0"` into whole seconds.
///
/// The fractional part, when present, must be digits and is dropped.
/// Signs, exponents, embedded spaces and overflow are rejected.
fn parse_seconds(payload: &str) -> Option<u32> {
    let (whole, fraction) = match payload.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (payload, None),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(f) = fraction {
        if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    whole.parse().ok()
}
