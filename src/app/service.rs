//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, its context (code buffer, lockout clock,
//! secret) and the authority client.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!     TouchPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!     ClockPort ──▶ │       AppService        │
//! LockActuator  ◀── │  Keypad · FSM · Lockout │ ◀─▶ HttpPort
//!  IndicatorPort ◀──└─────────────────────────┘      (authority)
//! ```
//!
//! One call to [`AppService::tick`] samples the keypad once, advances the
//! FSM once, delivers at most one report and applies actuator changes.

use log::{debug, info, warn};

use crate::authority::{AttemptReport, AuthorityClient, Outcome, parse_directive};
use crate::config::LockConfig;
use crate::fsm::context::{ActuatorCommands, FsmContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::keypad::TouchEdgeDetector;

use super::events::AppEvent;
use super::ports::{
    ClockPort, EventSink, HttpPort, IndicatorChannel, IndicatorPort, LockActuatorPort, TouchPort,
};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    authority: AuthorityClient,
    edges: TouchEdgeDetector,
    /// Last commands written to hardware; `None` forces a full write.
    applied: Option<ActuatorCommands>,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: LockConfig) -> Self {
        let authority = AuthorityClient::new(&config.authority_url);
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            authority,
            edges: TouchEdgeDetector::new(),
            applied: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Idle and drive the lock to its rest position.
    pub fn start(
        &mut self,
        hw: &mut (impl LockActuatorPort + IndicatorPort),
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = clock.now_ms();
        self.fsm.start(&mut self.ctx);
        self.apply_actuators(hw);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sample keypad → FSM → report → actuators.
    ///
    /// `hw` is one adapter implementing all three hardware ports.
    pub fn tick(
        &mut self,
        hw: &mut (impl TouchPort + LockActuatorPort + IndicatorPort),
        net: &mut impl HttpPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.ctx.now_ms = clock.now_ms();
        let prev_state = self.fsm.current_state();

        // 1. Sample the keypad once.  The edge detector sees every good
        //    sample so a pad held through a lockout doesn't fire later; a
        //    failed read leaves it on the last good sample.
        let presses = match hw.poll() {
            Ok(mask) => Some(self.edges.update(mask)),
            Err(e) => {
                warn!("Touch read failed: {}", e);
                None
            }
        };
        if let Some(presses) = presses.filter(|_| self.accepting_input()) {
            for sensor in presses {
                if self.ctx.keypad.record_touch(sensor) {
                    debug!("Sensor {} touched", sensor);
                    sink.emit(&AppEvent::DigitEntered {
                        count: self.ctx.keypad.len() as u8,
                    });
                }
            }
        }

        // 2. FSM tick (pure state logic)
        self.fsm.tick(&mut self.ctx);

        // 3. Deliver the queued report, if the FSM produced one.
        if let Some(report) = self.ctx.outbox.take() {
            self.deliver(report, net, clock, sink);
        }

        // 4. Apply actuator commands
        self.apply_actuators(hw);

        // 5. Emit state change if the FSM moved
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
            if prev_state == StateId::LockedOut && new_state == StateId::Idle {
                sink.emit(&AppEvent::LockoutCleared);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Digits buffered towards the next code.
    pub fn digits_entered(&self) -> usize {
        self.ctx.keypad.len()
    }

    /// Milliseconds left on the lockout as of the last tick (0 when open).
    pub fn lockout_remaining_ms(&self) -> u64 {
        self.ctx.lockout.remaining_ms(self.ctx.now_ms)
    }

    /// Commands most recently produced by the FSM.
    pub fn commands(&self) -> ActuatorCommands {
        self.ctx.commands
    }

    /// Recommended delay before the next tick.
    ///
    /// While locked out nothing happens between lockout checks, so the
    /// loop may sleep for the whole poll interval.
    pub fn next_tick_delay_ms(&self) -> u32 {
        match self.fsm.current_state() {
            StateId::LockedOut => {
                let until_check = self.ctx.next_lockout_check_ms.saturating_sub(self.ctx.now_ms);
                (until_check as u32).max(self.ctx.config.tick_interval_ms)
            }
            _ => self.ctx.config.tick_interval_ms,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn accepting_input(&self) -> bool {
        self.fsm.current_state() == StateId::Idle && !self.ctx.is_locked_out()
    }

    /// Send one report and fold the authority's answer back into the
    /// lockout clock.  Never fails: an absent reply means no directive.
    fn deliver(
        &mut self,
        report: AttemptReport,
        net: &mut impl HttpPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let AttemptReport { outcome, code } = report;
        sink.emit(&match outcome {
            Outcome::Unlocked => AppEvent::CodeAccepted,
            Outcome::Attempt => AppEvent::CodeRejected,
        });

        let reply = self.authority.report(net, outcome, &code);

        let Some(reply) = reply else {
            sink.emit(&AppEvent::ReportFailed(outcome));
            return;
        };

        // A successful unlock needs nothing back from the authority.
        if outcome == Outcome::Unlocked {
            return;
        }

        match parse_directive(&reply) {
            Some(directive) => {
                // The request may have taken a while; measure from now.
                let now = clock.now_ms();
                if self.ctx.lockout.set_lockout(now, directive.duration_secs) {
                    info!("Parsed lockout time: {}s", directive.duration_secs);
                    sink.emit(&AppEvent::LockoutApplied {
                        secs: directive.duration_secs,
                    });
                }
            }
            None => debug!("Authority reply carries no lockout directive"),
        }
    }

    /// Translate FSM actuator commands into port calls, writing only
    /// outputs that changed.
    fn apply_actuators(&mut self, hw: &mut (impl LockActuatorPort + IndicatorPort)) {
        let cmds = self.ctx.commands;
        let prev = self.applied;

        if prev.is_none_or(|p| p.servo_angle != cmds.servo_angle) {
            hw.set_position(cmds.servo_angle);
        }
        if prev.is_none_or(|p| p.ok_led != cmds.ok_led) {
            hw.set(IndicatorChannel::Ok, cmds.ok_led);
        }
        if prev.is_none_or(|p| p.fail_led != cmds.fail_led) {
            hw.set(IndicatorChannel::Fail, cmds.fail_led);
        }

        self.applied = Some(cmds);
    }
}
