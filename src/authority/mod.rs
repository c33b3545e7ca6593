//! Remote attempt authority: the policy side of lockouts.
//!
//! The lock does not count failures itself.  Every completed code is
//! reported to an HTTP authority, which answers with free text.  When the
//! text contains a lockout marker the lock stops accepting input for the
//! stated number of seconds.
//!
//! ```text
//!  AppService ──report()──▶ GET {base}/?status=attempt&code=9999
//!             ◀──────────── "... LOCKED OUT for 60.0 seconds"
//!             ──parse_directive()──▶ LockoutDirective { 60 }
//! ```
//!
//! - [`client`] builds the request and degrades every transport failure
//!   to "no reply".
//! - [`directive`] scrapes the reply; anything it cannot make sense of is
//!   "no directive".

pub mod client;
pub mod directive;

pub use client::AuthorityClient;
pub use directive::{LockoutDirective, parse_directive};

use core::fmt;

use crate::keypad::Code;

/// What happened with a completed code, as reported to the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The code matched and the lock opened.
    Unlocked,
    /// The code did not match.
    Attempt,
}

impl Outcome {
    /// Value of the `status` query parameter.
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Unlocked => "unlocked",
            Self::Attempt => "attempt",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// One outbound report.  Built, sent, dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub outcome: Outcome,
    pub code: Code,
}
