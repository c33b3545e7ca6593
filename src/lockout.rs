//! Lockout clock.
//!
//! Holds at most one deadline.  The controller is locked out while
//! `now < until`; once the deadline passes it is implicitly open again.
//! There is no explicit unlock: the state is a comparison, not a flag.

use log::debug;

/// Deadline-based input gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockoutClock {
    until_ms: Option<u64>,
}

impl LockoutClock {
    pub fn new() -> Self {
        Self { until_ms: None }
    }

    /// `true` iff a deadline is set and `now_ms` is before it.
    pub fn is_locked(&self, now_ms: u64) -> bool {
        self.until_ms.is_some_and(|until| now_ms < until)
    }

    /// Lock out input for `[now_ms, now_ms + duration_secs * 1000)`.
    ///
    /// Overwrites any existing deadline.  A zero duration leaves the clock
    /// untouched.  Returns whether a deadline was stored.
    pub fn set_lockout(&mut self, now_ms: u64, duration_secs: u32) -> bool {
        if duration_secs == 0 {
            debug!("lockout: zero duration ignored");
            return false;
        }
        let until = now_ms.saturating_add(u64::from(duration_secs) * 1000);
        self.until_ms = Some(until);
        true
    }

    /// Milliseconds until the deadline, or 0 when open.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.until_ms.map_or(0, |until| until.saturating_sub(now_ms))
    }

    /// The stored deadline, if any (may already be in the past).
    pub fn deadline_ms(&self) -> Option<u64> {
        self.until_ms
    }
}
