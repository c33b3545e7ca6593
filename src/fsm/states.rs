//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.  Timed phases compare the tick timestamp
//! against the state entry time instead of sleeping, so every tick
//! returns promptly.
//!
//! ```text
//!            [deadline in future]
//!   IDLE ─────────────────────────────▶ LOCKED_OUT
//!    ▲ │ ◀──────[deadline passed]──────────┘
//!    │ │
//!    │ └─[4 digits]─▶ EVALUATING ─[match]────▶ UNLOCKING ─[dwell]──┐
//!    │                     │                                      │
//!    │                 [mismatch]                                 │
//!    │                     ▼                                      │
//!    └──[blinks done]── BLINKING                                  │
//!    ▲                                                            │
//!    └────────────────────────────────────────────────────────────┘
//! ```

use super::context::{ActuatorCommands, FsmContext};
use super::{StateDescriptor, StateId};
use crate::authority::{AttemptReport, Outcome};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: LockedOut
        StateDescriptor {
            id: StateId::LockedOut,
            name: "LockedOut",
            on_enter: Some(locked_out_enter),
            on_exit: None,
            on_update: locked_out_update,
        },
        // Index 2: Evaluating
        StateDescriptor {
            id: StateId::Evaluating,
            name: "Evaluating",
            on_enter: Some(evaluating_enter),
            on_exit: Some(evaluating_exit),
            on_update: evaluating_update,
        },
        // Index 3: Unlocking
        StateDescriptor {
            id: StateId::Unlocking,
            name: "Unlocking",
            on_enter: Some(unlocking_enter),
            on_exit: None,
            on_update: unlocking_update,
        },
        // Index 4: Blinking
        StateDescriptor {
            id: StateId::Blinking,
            name: "Blinking",
            on_enter: Some(blinking_enter),
            on_exit: None,
            on_update: blinking_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state: bolt thrown, accepting digits
// ═══════════════════════════════════════════════════════════════════════════

/// Rest state is red on, including straight after a wrong-code blink.
fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::locked(&ctx.config);
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    // Guard: an active lockout takes precedence over any buffered digits.
    if ctx.is_locked_out() {
        return Some(StateId::LockedOut);
    }

    if let Some(code) = ctx.keypad.take_if_complete() {
        ctx.pending = Some(code);
        return Some(StateId::Evaluating);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  LOCKED_OUT state: input ignored until the deadline passes
// ═══════════════════════════════════════════════════════════════════════════

fn locked_out_enter(ctx: &mut FsmContext) {
    ctx.keypad.clear();
    ctx.next_lockout_check_ms = ctx.now_ms.saturating_add(u64::from(ctx.config.lockout_poll_ms));
    warn!(
        "LOCKED_OUT: input disabled for {}s",
        ctx.lockout.remaining_ms(ctx.now_ms).div_ceil(1000)
    );
}

fn locked_out_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.now_ms < ctx.next_lockout_check_ms {
        return None;
    }
    ctx.next_lockout_check_ms = ctx.now_ms.saturating_add(u64::from(ctx.config.lockout_poll_ms));

    if ctx.is_locked_out() {
        info!(
            "LOCKED_OUT: device is locked out, {}s remaining",
            ctx.lockout.remaining_ms(ctx.now_ms).div_ceil(1000)
        );
        return None;
    }

    info!("LOCKED_OUT: deadline passed, accepting input");
    Some(StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  EVALUATING state: compare once, queue the report
// ═══════════════════════════════════════════════════════════════════════════

fn evaluating_enter(ctx: &mut FsmContext) {
    // The keypad was emptied by take_if_complete(); the pending code is
    // consumed here so nothing of it survives the evaluation.
    let Some(code) = ctx.pending.take() else {
        warn!("EVALUATING: entered without a pending code");
        ctx.verdict = None;
        return;
    };

    let outcome = if code.matches(&ctx.config.secret) {
        info!("EVALUATING: correct code");
        Outcome::Unlocked
    } else {
        info!("EVALUATING: incorrect code");
        Outcome::Attempt
    };

    ctx.verdict = Some(outcome);
    ctx.outbox = Some(AttemptReport { outcome, code });
}

fn evaluating_exit(ctx: &mut FsmContext) {
    ctx.verdict = None;
    ctx.keypad.clear();
}

fn evaluating_update(ctx: &mut FsmContext) -> Option<StateId> {
    match ctx.verdict {
        Some(Outcome::Unlocked) => Some(StateId::Unlocking),
        Some(Outcome::Attempt) => Some(StateId::Blinking),
        None => Some(StateId::Idle),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  UNLOCKING state: bolt retracted for the dwell time
// ═══════════════════════════════════════════════════════════════════════════

fn unlocking_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::unlocked(&ctx.config);
    info!("UNLOCKING: open for {}ms", ctx.config.unlock_dwell_ms);
}

fn unlocking_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.ms_in_state() >= u64::from(ctx.config.unlock_dwell_ms) {
        info!("UNLOCKING: dwell elapsed, relocking");
        return Some(StateId::Idle);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  BLINKING state: red LED flashes after a wrong code
// ═══════════════════════════════════════════════════════════════════════════

fn blinking_enter(ctx: &mut FsmContext) {
    ctx.commands.fail_led = true;
    ctx.commands.ok_led = false;
}

fn blinking_update(ctx: &mut FsmContext) -> Option<StateId> {
    let half = u64::from(ctx.config.blink_half_period_ms);
    let phase = ctx.ms_in_state() / half;

    // Even phases on, odd phases off; `blink_count` on/off pairs in total.
    if phase >= 2 * u64::from(ctx.config.blink_count) {
        return Some(StateId::Idle);
    }
    ctx.commands.fail_led = phase % 2 == 0;
    None
}
