//! ADC in single conversion mode
//!
//! The photocell needs one blocking 10-bit conversion per loop
//! iteration. AVCC reference, /128 prescaler (125 kHz ADC clock at
//! 16 MHz).

use avr_device::atmega128a::ADC;

/// Analog inputs ADC0..ADC7 on PORTF.
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum AdcChannel {
    Adc0 = 0,
    Adc1 = 1,
    Adc2 = 2,
    Adc3 = 3,
    Adc4 = 4,
    Adc5 = 5,
    Adc6 = 6,
    Adc7 = 7,
}

pub struct Adc {
    _private: (),
}

impl Adc {
    pub fn new() -> Self {
        unsafe {
            let p = ADC::ptr();
            // AVCC reference, right-adjusted result
            (*p).admux.write(|w| w.bits(0x40));
            // Enable, prescaler div128 (125kHz @ 16MHz)
            (*p).adcsra.write(|w| w.bits(0x87));
        }
        Self { _private: () }
    }

    /// Runs one blocking conversion on `channel`.
    pub fn read_channel(&mut self, channel: AdcChannel) -> u16 {
        unsafe {
            let p = ADC::ptr();

            // Select channel, keep the reference bits
            (*p).admux.modify(|r, w| w.bits((r.bits() & 0xE0) | (channel as u8)));

            // Start conversion and wait for ADSC to clear
            (*p).adcsra.modify(|r, w| w.bits(r.bits() | 0x40));
            while (*p).adcsra.read().bits() & 0x40 != 0 {}

            // ADCL/ADCH exposed as one 16-bit data register
            (*p).adc.read().bits()
        }
    }
}

impl Default for Adc {
    fn default() -> Self {
        Self::new()
    }
}
