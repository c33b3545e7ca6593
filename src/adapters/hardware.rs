//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the touch controller, the servo and the indicator LEDs, exposing
//! them through [`TouchPort`], [`LockActuatorPort`] and [`IndicatorPort`].
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets the servo and LED drivers use cfg-gated
//! simulation stubs, and the touch controller runs over whatever I²C bus
//! it is given.

use embedded_hal::i2c::I2c;

use crate::app::ports::{IndicatorChannel, IndicatorPort, LockActuatorPort, TouchPort};
use crate::drivers::cap1188::Cap1188;
use crate::drivers::indicator::IndicatorLeds;
use crate::drivers::servo::ServoDriver;
use crate::error::TouchError;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I2C> {
    keypad: Cap1188<I2C>,
    servo: ServoDriver,
    leds: IndicatorLeds,
}

impl<I2C: I2c> HardwareAdapter<I2C> {
    /// `keypad` must already have passed [`Cap1188::begin`].
    pub fn new(keypad: Cap1188<I2C>, servo: ServoDriver, leds: IndicatorLeds) -> Self {
        Self {
            keypad,
            servo,
            leds,
        }
    }

    pub fn servo_angle(&self) -> Option<u8> {
        self.servo.angle()
    }

    pub fn indicator(&self, channel: IndicatorChannel) -> bool {
        self.leds.is_on(channel)
    }
}

// ── TouchPort implementation ──────────────────────────────────

impl<I2C: I2c> TouchPort for HardwareAdapter<I2C> {
    fn poll(&mut self) -> Result<u8, TouchError> {
        self.keypad.touched()
    }
}

// ── Actuator port implementations ─────────────────────────────

impl<I2C: I2c> LockActuatorPort for HardwareAdapter<I2C> {
    fn set_position(&mut self, angle: u8) {
        self.servo.set_angle(angle);
    }
}

impl<I2C: I2c> IndicatorPort for HardwareAdapter<I2C> {
    fn set(&mut self, channel: IndicatorChannel, on: bool) {
        self.leds.set(channel, on);
    }
}
