//! Microchip CAP1188 8-channel capacitive touch controller.
//!
//! Generic over any [`embedded_hal::i2c::I2c`] bus, so the same driver runs
//! on the ESP-IDF `I2cDriver` and on a register-file mock in host tests.
//!
//! ## Register usage
//!
//! | Reg  | Name                 | Use                                   |
//! |------|----------------------|---------------------------------------|
//! | 0x00 | Main Control         | INT bit cleared after each read       |
//! | 0x03 | Sensor Input Status  | bit n = input n+1 touched             |
//! | 0x2A | Multiple Touch Cfg   | 0 = allow simultaneous touches        |
//! | 0x41 | Standby Configuration| averaging / sample time               |
//! | 0x72 | Sensor Input LED Link| 0xFF = each LED follows its pad       |
//! | 0xFD | Product ID           | 0x50                                  |
//! | 0xFE | Manufacturer ID      | 0x5D                                  |
//! | 0xFF | Revision             | logged only                           |

use embedded_hal::i2c::I2c;
use log::info;

use crate::error::TouchError;

/// Default 7-bit address with the ADDR_COMM pin floating.
pub const DEFAULT_ADDRESS: u8 = 0x29;

const REG_MAIN_CONTROL: u8 = 0x00;
const REG_SENSOR_INPUT_STATUS: u8 = 0x03;
const REG_MULTI_TOUCH_CONFIG: u8 = 0x2A;
const REG_STANDBY_CONFIG: u8 = 0x41;
const REG_LED_LINKING: u8 = 0x72;
const REG_PRODUCT_ID: u8 = 0xFD;
const REG_MANUFACTURER_ID: u8 = 0xFE;
const REG_REVISION: u8 = 0xFF;

const MAIN_CONTROL_INT: u8 = 0x01;

const EXPECTED_PRODUCT_ID: u8 = 0x50;
const EXPECTED_MANUFACTURER_ID: u8 = 0x5D;

pub struct Cap1188<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Cap1188<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Verify the chip identity and apply the keypad configuration.
    /// Returns the silicon revision.
    pub fn begin(&mut self) -> Result<u8, TouchError> {
        let product = self.read_register(REG_PRODUCT_ID)?;
        if product != EXPECTED_PRODUCT_ID {
            return Err(TouchError::UnexpectedProductId(product));
        }
        let manufacturer = self.read_register(REG_MANUFACTURER_ID)?;
        if manufacturer != EXPECTED_MANUFACTURER_ID {
            return Err(TouchError::UnexpectedManufacturerId(manufacturer));
        }
        let revision = self.read_register(REG_REVISION)?;

        self.write_register(REG_MULTI_TOUCH_CONFIG, 0x00)?;
        self.write_register(REG_LED_LINKING, 0xFF)?;
        self.write_register(REG_STANDBY_CONFIG, 0x30)?;

        info!(
            "CAP1188: product=0x{:02X} mfr=0x{:02X} rev=0x{:02X} at 0x{:02X}",
            product, manufacturer, revision, self.address
        );
        Ok(revision)
    }

    /// Bitmask of touched inputs.  Clears the INT latch when anything is
    /// reported so the next touch raises it again.
    pub fn touched(&mut self) -> Result<u8, TouchError> {
        let status = self.read_register(REG_SENSOR_INPUT_STATUS)?;
        if status != 0 {
            let main = self.read_register(REG_MAIN_CONTROL)?;
            self.write_register(REG_MAIN_CONTROL, main & !MAIN_CONTROL_INT)?;
        }
        Ok(status)
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, TouchError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|_| TouchError::Bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), TouchError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|_| TouchError::Bus)
    }
}
