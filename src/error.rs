//! Unified error types for the TouchLock firmware.
//!
//! A single `Error` enum that every hardware subsystem converts into, so
//! `main` can report startup failures uniformly before halting.  All
//! variants are `Copy` so drivers can return them without allocation.
//!
//! Runtime failures on the network side never reach this type: the
//! authority client degrades them to "no reply" (see
//! [`TransportError`](crate::app::ports::TransportError)).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible hardware operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The touch controller could not be read or identified.
    Touch(TouchError),
    /// A lock or indicator output could not be driven.
    Actuator(ActuatorError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Touch(e) => write!(f, "touch: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Touch controller errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchError {
    /// I2C transaction failed (NACK, arbitration loss, timeout).
    Bus,
    /// The device answered but its product ID did not match.
    UnexpectedProductId(u8),
    /// The device answered but its manufacturer ID did not match.
    UnexpectedManufacturerId(u8),
}

impl fmt::Display for TouchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C transaction failed"),
            Self::UnexpectedProductId(id) => write!(f, "unexpected product ID 0x{id:02X}"),
            Self::UnexpectedManufacturerId(id) => {
                write!(f, "unexpected manufacturer ID 0x{id:02X}")
            }
        }
    }
}

impl From<TouchError> for Error {
    fn from(e: TouchError) -> Self {
        Self::Touch(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM timer or channel configuration failed.
    PwmConfigFailed(i32),
    /// GPIO configuration failed.
    GpioConfigFailed(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmConfigFailed(rc) => write!(f, "PWM config failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    WifiInitFailed,
    WifiConnectFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiInitFailed => write!(f, "WiFi driver init failed"),
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

impl From<crate::app::ports::ConfigError> for Error {
    fn from(e: crate::app::ports::ConfigError) -> Self {
        use crate::app::ports::ConfigError;
        match e {
            ConfigError::Corrupted => Self::Config("document is not valid JSON for LockConfig"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
