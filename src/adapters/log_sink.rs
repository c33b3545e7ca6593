//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Each event is one line with a fixed tag so the console can be grepped.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::DigitEntered { count } => {
                info!("CODE | digit {} entered", count);
            }
            AppEvent::CodeAccepted => {
                info!("CODE | accepted, unlocking");
            }
            AppEvent::CodeRejected => {
                info!("CODE | rejected");
            }
            AppEvent::LockoutApplied { secs } => {
                warn!("LOCKOUT | applied for {}s", secs);
            }
            AppEvent::LockoutCleared => {
                info!("LOCKOUT | cleared");
            }
            AppEvent::ReportFailed(outcome) => {
                warn!("REPORT | '{}' not delivered", outcome);
            }
        }
    }
}
