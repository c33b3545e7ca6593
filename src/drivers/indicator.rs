//! Red / green status LEDs on plain GPIO outputs.

use crate::app::ports::IndicatorChannel;
use crate::drivers::hw_init;
use crate::pins;

pub struct IndicatorLeds {
    ok: bool,
    fail: bool,
}

impl Default for IndicatorLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorLeds {
    pub fn new() -> Self {
        Self {
            ok: false,
            fail: false,
        }
    }

    pub fn set(&mut self, channel: IndicatorChannel, on: bool) {
        match channel {
            IndicatorChannel::Ok => {
                hw_init::gpio_write(pins::GREEN_LED_GPIO, on);
                self.ok = on;
            }
            IndicatorChannel::Fail => {
                hw_init::gpio_write(pins::RED_LED_GPIO, on);
                self.fail = on;
            }
        }
    }

    pub fn is_on(&self, channel: IndicatorChannel) -> bool {
        match channel {
            IndicatorChannel::Ok => self.ok,
            IndicatorChannel::Fail => self.fail,
        }
    }
}
