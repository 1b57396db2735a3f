//! Threshold persistence in on-chip EEPROM
//!
//! The two calibration words live at fixed addresses with a gap between
//! them, the layout existing installations were flashed with. Erased
//! cells read 0xFF, so a factory-fresh device reports 65535/65535 and
//! never triggers until it is calibrated over the serial link.

use crate::config::{EEPROM_ADDR_HIGH, EEPROM_ADDR_LOW};
use crate::hal::Eeprom;
use crate::ports::{ThresholdStore, Thresholds};

pub struct EepromThresholds {
    eeprom: Eeprom,
}

impl EepromThresholds {
    pub fn new(eeprom: Eeprom) -> Self {
        Self { eeprom }
    }
}

impl ThresholdStore for EepromThresholds {
    fn load(&mut self) -> Thresholds {
        Thresholds {
            low: self.eeprom.read_word(EEPROM_ADDR_LOW),
            high: self.eeprom.read_word(EEPROM_ADDR_HIGH),
        }
    }

    fn store(&mut self, thresholds: Thresholds) {
        self.eeprom.write_word(EEPROM_ADDR_LOW, thresholds.low);
        self.eeprom.write_word(EEPROM_ADDR_HIGH, thresholds.high);
    }
}
