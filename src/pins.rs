//! GPIO / peripheral pin assignments for the TouchLock board (ESP32 DevKit).
//!
//! Wiring follows the prototype board: servo signal on GPIO13, LEDs on
//! GPIO26/27, CAP1188 breakout on the default I2C pins.

// ---------------------------------------------------------------------------
// Lock servo (SG90-class hobby servo)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the servo signal line.
pub const SERVO_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Status indicators (discrete LEDs, active HIGH)
// ---------------------------------------------------------------------------

/// Red LED: lit while locked, blinks on a wrong code.
pub const RED_LED_GPIO: i32 = 26;
/// Green LED: lit while unlocked.
pub const GREEN_LED_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// I²C bus (CAP1188 capacitive touch controller)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// Bus clock for the touch controller.
pub const I2C_FREQ_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution for the servo (bits).  14-bit gives ~1.2 µs steps
/// over the 20 ms frame.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Standard hobby-servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
