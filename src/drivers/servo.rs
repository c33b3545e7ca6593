//! Hobby-servo driver for the lock bolt.
//!
//! Positions are angles in degrees, mapped linearly onto a pulse width
//! within the 20 ms frame, then into LEDC duty counts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC servo channel via hw_init.
//! On host/test: tracks the last commanded angle in-memory only.

use crate::drivers::hw_init;
use crate::pins;

/// Pulse width at 0°.
pub const MIN_PULSE_US: u32 = 544;
/// Pulse width at 180°.
pub const MAX_PULSE_US: u32 = 2400;
pub const MAX_ANGLE: u8 = 180;

const FRAME_US: u64 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ as u64;

/// Pulse width for `angle`, clamped to 0..=180°.
pub fn pulse_width_us(angle: u8) -> u32 {
    let angle = u32::from(angle.min(MAX_ANGLE));
    MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * angle / u32::from(MAX_ANGLE)
}

/// LEDC duty counts for a pulse of `pulse_us` at `resolution_bits`.
pub fn duty_for_pulse(pulse_us: u32, resolution_bits: u32) -> u32 {
    let full_scale = 1u64 << resolution_bits;
    (u64::from(pulse_us) * full_scale / FRAME_US) as u32
}

pub struct ServoDriver {
    angle: Option<u8>,
}

impl Default for ServoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoDriver {
    pub fn new() -> Self {
        Self { angle: None }
    }

    pub fn set_angle(&mut self, angle: u8) {
        let angle = angle.min(MAX_ANGLE);
        let duty = duty_for_pulse(pulse_width_us(angle), pins::SERVO_PWM_RESOLUTION_BITS);
        hw_init::ledc_set_duty(hw_init::LEDC_CH_SERVO, duty);
        self.angle = Some(angle);
    }

    /// Last commanded angle; `None` before the first command.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }
}
