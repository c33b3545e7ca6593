//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It owns the code being entered, the lockout deadline, the
//! actuator command outputs, timing and configuration.  Handlers never
//! perform I/O: a report to the authority is queued in [`outbox`] and
//! flushed by the service after the tick.
//!
//! [`outbox`]: FsmContext::outbox

use crate::authority::{AttemptReport, Outcome};
use crate::config::LockConfig;
use crate::keypad::{Code, InputAccumulator};
use crate::lockout::LockoutClock;

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Desired output state of the lock and its indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Servo angle in degrees.
    pub servo_angle: u8,
    /// Green indicator.
    pub ok_led: bool,
    /// Red indicator.
    pub fail_led: bool,
}

impl ActuatorCommands {
    /// Bolt thrown, red on.
    pub fn locked(config: &LockConfig) -> Self {
        Self {
            servo_angle: config.locked_angle,
            ok_led: false,
            fail_led: true,
        }
    }

    /// Bolt retracted, green on.
    pub fn unlocked(config: &LockConfig) -> Self {
        Self {
            servo_angle: config.unlocked_angle,
            ok_led: true,
            fail_led: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Monotonic time sampled at the start of the current tick.
    pub now_ms: u64,
    /// Time at which the current state was entered.
    pub state_entered_ms: u64,
    /// Next time the lockout deadline is rechecked while locked out.
    pub next_lockout_check_ms: u64,

    // -- Code entry --
    /// Digits entered so far.
    pub keypad: InputAccumulator,
    /// Code taken from the keypad, waiting for evaluation.
    pub pending: Option<Code>,
    /// Result of the last evaluation; consumed by `Evaluating`.
    pub verdict: Option<Outcome>,

    // -- Lockout --
    pub lockout: LockoutClock,

    // -- Outputs --
    /// Commands to be applied to actuators after the FSM tick.
    pub commands: ActuatorCommands,
    /// Report queued for the authority; flushed after the FSM tick.
    pub outbox: Option<AttemptReport>,

    // -- Configuration --
    pub config: LockConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: LockConfig) -> Self {
        Self {
            now_ms: 0,
            state_entered_ms: 0,
            next_lockout_check_ms: 0,
            keypad: InputAccumulator::new(),
            pending: None,
            verdict: None,
            lockout: LockoutClock::new(),
            commands: ActuatorCommands::locked(&config),
            outbox: None,
            config,
        }
    }

    /// Milliseconds elapsed since the current state was entered.
    pub fn ms_in_state(&self) -> u64 {
        self.now_ms.saturating_sub(self.state_entered_ms)
    }

    /// Whether the lockout deadline is still in the future.
    pub fn is_locked_out(&self) -> bool {
        self.lockout.is_locked(self.now_ms)
    }
}
