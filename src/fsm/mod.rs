//! Lock state machine: a table of plain `fn` handlers per state.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌────────────┬───────────┬──────────┬───────────────────┐   │
//! │  │ StateId    │ on_enter  │ on_exit  │ on_update         │   │
//! │  ├────────────┼───────────┼──────────┼───────────────────┤   │
//! │  │ Idle       │ fn(ctx)   │ —        │ fn(ctx)->Option<> │   │
//! │  │ LockedOut  │ fn(ctx)   │ —        │ fn(ctx)->Option<> │   │
//! │  │ Evaluating │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │   │
//! │  │ Unlocking  │ fn(ctx)   │ —        │ fn(ctx)->Option<> │   │
//! │  │ Blinking   │ fn(ctx)   │ —        │ fn(ctx)->Option<> │   │
//! │  └────────────┴───────────┴──────────┴───────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A tick runs the active row's `on_update`; a `Some(next)` result swaps
//! rows, running the old `on_exit` and the new `on_enter` in that order.
//! Handlers share one `&mut FsmContext`.  The caller stamps `now_ms`
//! before every tick; handlers never read a clock themselves.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Lock states.  The discriminant is the row in
/// [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    LockedOut = 1,
    Evaluating = 2,
    Unlocking = 3,
    Blinking = 4,
}

impl StateId {
    /// Rows in the state table.
    pub const COUNT: usize = 5;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Entry / exit hook, run once per transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-tick handler; `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// One row of the state table.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// Table-driven engine for the lock states.
pub struct Fsm {
    /// Indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Row of the active state.
    current: usize,
}

impl Fsm {
    /// `initial` is entered by [`start`](Self::start), not here.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Enter the initial state.  Call exactly once, before any tick.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM: boot state {}", self.table[self.current].name);
        ctx.state_entered_ms = ctx.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run the active state's update and follow any transition it asks for.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Active state.
    pub fn current_state(&self) -> StateId {
        self.table[self.current].id
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM: {} -> {} at {}ms",
            self.table[self.current].name, self.table[next_idx].name, ctx.now_ms
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.state_entered_ms = ctx.now_ms;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
