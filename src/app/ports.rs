//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (touch controller, servo, LEDs, HTTP, clock, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! ## Security notes
//!
//! - **HttpPort** carries the entered code in cleartext; transport security
//!   is out of scope for this firmware.
//! - All port errors are typed: callers must handle every variant explicitly.

use core::fmt;

use crate::error::TouchError;

// ───────────────────────────────────────────────────────────────
// Touch port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples the keypad once per tick.
pub trait TouchPort {
    /// Bitmask of currently touched sensors; bit `i` is sensor `i + 1`.
    fn poll(&mut self) -> Result<u8, TouchError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Drives the lock mechanism.
pub trait LockActuatorPort {
    /// Move the servo to `angle` degrees (0–180).
    fn set_position(&mut self, angle: u8);
}

/// The two status indicator channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorChannel {
    /// Green: access granted.
    Ok,
    /// Red: locked / access denied.
    Fail,
}

/// Drives the status indicators.
pub trait IndicatorPort {
    fn set(&mut self, channel: IndicatorChannel, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain → attempt authority)
// ───────────────────────────────────────────────────────────────

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Single blocking HTTP GET.
pub trait HttpPort {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait ClockPort {
    /// Milliseconds since boot.  Never goes backwards.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`HttpPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The network link is down; no request was attempted.
    NotConnected,
    /// The URL does not fit the request buffer or is malformed.
    InvalidUrl,
    /// The request could not be completed (connect, timeout, reset).
    /// Carries the platform error code when one exists.
    RequestFailed(i32),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "network not connected"),
            Self::InvalidUrl => write!(f, "invalid URL"),
            Self::RequestFailed(code) => write!(f, "request failed (code={})", code),
        }
    }
}

/// Errors from configuration loading and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config document failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
