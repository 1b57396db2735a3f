//! On-chip EEPROM access
//!
//! Byte and word access with the datasheet write sequence. A write
//! takes a few milliseconds of self-timed programming; both reads and
//! writes busy-wait on the previous write before touching the address
//! register.

use avr_device::atmega128a::EEPROM;

pub struct Eeprom {
    _private: (),
}

impl Eeprom {
    pub fn new() -> Self {
        Self { _private: () }
    }

    pub fn read_byte(&mut self, address: u16) -> u8 {
        self.wait_ready();
        unsafe {
            let p = EEPROM::ptr();
            (*p).eear.write(|w| w.bits(address));
            // EERE strobes the read; data is valid immediately after
            (*p).eecr.write(|w| w.bits(0x01));
            (*p).eedr.read().bits()
        }
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.wait_ready();
        unsafe {
            let p = EEPROM::ptr();
            (*p).eear.write(|w| w.bits(address));
            (*p).eedr.write(|w| w.bits(value));
            // EEWE must follow EEMWE within four cycles, so interrupts
            // stay off for the two strobes
            avr_device::interrupt::free(|_| {
                (*p).eecr.write(|w| w.bits(0x04));
                (*p).eecr.write(|w| w.bits(0x06));
            });
        }
    }

    /// Little-endian 16-bit read at `address`.
    pub fn read_word(&mut self, address: u16) -> u16 {
        let low = self.read_byte(address) as u16;
        let high = self.read_byte(address + 1) as u16;
        (high << 8) | low
    }

    /// Little-endian 16-bit write at `address`.
    pub fn write_word(&mut self, address: u16, value: u16) {
        self.write_byte(address, value as u8);
        self.write_byte(address + 1, (value >> 8) as u8);
    }

    fn wait_ready(&self) {
        unsafe {
            // EEWE clears when the self-timed write completes
            while (*EEPROM::ptr()).eecr.read().bits() & 0x02 != 0 {}
        }
    }
}

impl Default for Eeprom {
    fn default() -> Self {
        Self::new()
    }
}
