//! Peripheral drivers and one-shot hardware initialisation.

pub mod cap1188;
pub mod hw_init;
pub mod indicator;
pub mod servo;
pub mod watchdog;
