//! Trigger indicator LED on PORTB

use avr_device::atmega128a::PORTB;
use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

/// One PORTB pin driven as the trigger indicator.
pub struct Led {
    mask: u8,
}

impl Led {
    /// Claims PORTB bit `pin` and configures it as an output, low.
    pub fn new(pin: u8) -> Self {
        let mask = 1 << pin;
        unsafe {
            let p = PORTB::ptr();
            (*p).portb.modify(|r, w| w.bits(r.bits() & !mask));
            (*p).ddrb.modify(|r, w| w.bits(r.bits() | mask));
        }
        Self { mask }
    }
}

impl OutputPin for Led {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() & !self.mask));
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() | self.mask));
        }
        Ok(())
    }
}
