//! Monotonic clock adapters.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side simulation, plus [`ManualClock`] for deterministic tests.

use crate::app::ports::ClockPort;

/// Boot-relative monotonic clock.
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time is a read of the free-running system timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the clock was created.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl ClockPort for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }
}

/// Hand-advanced clock.  Clones share the same time, so a test and a
/// simulated peer can observe one timeline.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Default)]
pub struct ManualClock(std::rc::Rc<core::cell::Cell<u64>>);

#[cfg(not(target_os = "espidf"))]
impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(std::rc::Rc::new(core::cell::Cell::new(start_ms)))
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get().saturating_add(ms));
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}
