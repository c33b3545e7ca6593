//! Lock configuration parameters
//!
//! All tunable parameters for the TouchLock controller.  Defaults match the
//! shipped hardware; a JSON override document can be baked in at build time
//! (see `main.rs`).  The secret is never persisted: it lives only in this
//! struct for the lifetime of the process.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::keypad::{CODE_LENGTH, is_keypad_digit};

/// Core lock configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    // --- Credentials ---
    /// The unlock code: exactly [`CODE_LENGTH`] digits, each 1–8.
    pub secret: heapless::String<CODE_LENGTH>,

    // --- Attempt authority ---
    /// Base URL of the attempt authority (no trailing slash).
    pub authority_url: heapless::String<96>,
    /// Per-request HTTP timeout (milliseconds)
    pub http_timeout_ms: u32,

    // --- Lock actuator ---
    /// Servo angle (degrees) for the locked position
    pub locked_angle: u8,
    /// Servo angle (degrees) for the unlocked position
    pub unlocked_angle: u8,
    /// How long the lock stays open after a correct code (milliseconds)
    pub unlock_dwell_ms: u32,

    // --- Failure feedback ---
    /// Number of red-LED blinks after a wrong code
    pub blink_count: u8,
    /// Duration of each on and each off phase of a blink (milliseconds)
    pub blink_half_period_ms: u32,

    // --- Timing ---
    /// Interval between lockout deadline checks while locked out (milliseconds)
    pub lockout_poll_ms: u32,
    /// Control loop interval (milliseconds)
    pub tick_interval_ms: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        let mut secret = heapless::String::new();
        let _ = secret.push_str("1234");
        let mut authority_url = heapless::String::new();
        let _ = authority_url.push_str("http://lockdash.local:5000");

        Self {
            secret,

            authority_url,
            http_timeout_ms: 5_000,

            locked_angle: 90,
            unlocked_angle: 180,
            unlock_dwell_ms: 5_000,

            blink_count: 3,
            blink_half_period_ms: 200,

            lockout_poll_ms: 1_000,
            tick_interval_ms: 100, // 10 Hz
        }
    }
}

impl LockConfig {
    /// Parse a full configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field.  Rejected configs are fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() != CODE_LENGTH {
            return Err(ConfigError::ValidationFailed("secret must be exactly 4 digits"));
        }
        if !self.secret.chars().all(is_keypad_digit) {
            return Err(ConfigError::ValidationFailed("secret digits must be 1-8"));
        }
        if !self.authority_url.starts_with("http://") && !self.authority_url.starts_with("https://") {
            return Err(ConfigError::ValidationFailed("authority_url must be an http(s) URL"));
        }
        if self.authority_url.ends_with('/') {
            return Err(ConfigError::ValidationFailed("authority_url must not end with '/'"));
        }
        if self.locked_angle > 180 || self.unlocked_angle > 180 {
            return Err(ConfigError::ValidationFailed("servo angles must be 0-180"));
        }
        if self.locked_angle == self.unlocked_angle {
            return Err(ConfigError::ValidationFailed("locked and unlocked angles coincide"));
        }
        if self.tick_interval_ms == 0 || self.lockout_poll_ms == 0 || self.blink_half_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("timings must be non-zero"));
        }
        if self.http_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("http_timeout_ms must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret(s: &str) -> LockConfig {
        let mut c = LockConfig::default();
        c.secret.clear();
        c.secret.push_str(s).unwrap();
        c
    }

    #[test]
    fn default_config_is_sane() {
        let c = LockConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.secret.as_str(), "1234");
        assert_ne!(c.locked_angle, c.unlocked_angle);
        assert!(c.unlock_dwell_ms > 0);
    }

    #[test]
    fn secret_must_use_sensor_digits() {
        assert!(with_secret("8881").validate().is_ok());
        assert!(matches!(
            with_secret("1290").validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
        assert!(with_secret("123").validate().is_err());
    }

    #[test]
    fn trailing_slash_url_rejected() {
        let mut c = LockConfig::default();
        c.authority_url.push('/').unwrap();
        assert!(c.validate().is_err());
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = LockConfig::default();
        assert!(
            c.tick_interval_ms < c.blink_half_period_ms,
            "blink phases must span at least one tick"
        );
        assert!(
            c.tick_interval_ms <= c.lockout_poll_ms,
            "lockout poll cannot be faster than the control loop"
        );
    }

    #[test]
    fn json_override_parses() {
        let mut c = LockConfig::default();
        c.unlock_dwell_ms = 3_000;
        let json = serde_json::to_string(&c).unwrap();
        let parsed = LockConfig::from_json(&json).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn malformed_json_is_corrupted() {
        assert!(matches!(
            LockConfig::from_json("{\"secret\":"),
            Err(ConfigError::Corrupted)
        ));
    }
}
