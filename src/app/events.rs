//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, forward over the
//! network, etc.  Events never carry the entered digits.

use crate::authority::Outcome;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A digit was accepted; `count` digits are now buffered.
    DigitEntered { count: u8 },

    /// A complete code matched the secret.
    CodeAccepted,

    /// A complete code did not match the secret.
    CodeRejected,

    /// The authority imposed a lockout of `secs` seconds.
    LockoutApplied { secs: u32 },

    /// A lockout deadline has passed; input is accepted again.
    LockoutCleared,

    /// An outcome report got no reply from the authority.
    ReportFailed(Outcome),
}
