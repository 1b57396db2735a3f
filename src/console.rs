//! Serial console
//!
//! Thin byte and line I/O over any `embedded-hal` serial pair. Writes
//! busy-wait until the transport accepts each byte; reads are
//! non-blocking polls unless explicitly blocking. Transport errors are
//! swallowed; there is no side channel to report them on.

use embedded_hal::serial::{Read, Write};
use ufmt::uwrite;

pub struct Console<T> {
    serial: T,
}

impl<T> Console<T>
where
    T: Read<u8> + Write<u8>,
{
    pub fn new(serial: T) -> Self {
        Self { serial }
    }

    /// Polls for a pending byte without blocking.
    pub fn read_byte(&mut self) -> Option<u8> {
        self.serial.read().ok()
    }

    /// Spins until a byte arrives.
    pub fn read_byte_blocking(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.read_byte() {
                return byte;
            }
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        nb::block!(self.serial.write(byte)).ok();
    }

    pub fn write_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }

    pub fn write_line(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    pub fn write_u16(&mut self, value: u16) {
        uwrite!(self, "{}", value).ok();
    }

    /// One decimal value per line, the raw sample output format.
    pub fn write_u16_line(&mut self, value: u16) {
        self.write_u16(value);
        self.write_str("\r\n");
    }
}

impl<T> ufmt::uWrite for Console<T>
where
    T: Read<u8> + Write<u8>,
{
    type Error = core::convert::Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        Console::write_str(self, s);
        Ok(())
    }
}
