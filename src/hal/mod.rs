//! ATmega128 register-level drivers

pub mod adc;
pub mod eeprom;
pub mod gpio;
pub mod uart;

pub use adc::{Adc, AdcChannel};
pub use eeprom::Eeprom;
pub use gpio::Led;
pub use uart::Uart0;
