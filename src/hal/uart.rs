//! Polled USART0 driver
//!
//! The control loop is strictly synchronous, so the UART stays
//! interrupt-free: reads poll RXC0, writes spin on UDRE0. At 9600 baud
//! the loop revisits the one-byte receive buffer fast enough that
//! command bytes are not lost during normal operation.

use avr_device::atmega128a::USART0;
use core::convert::Infallible;
use embedded_hal::serial::{Read, Write};

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// 16x oversampling: UBRR = f_cpu / (16 * baud) - 1
const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

pub struct Uart0 {
    _private: (),
}

impl Uart0 {
    pub fn new() -> Self {
        unsafe {
            let p = USART0::ptr();

            // UBRR0H must be written before UBRR0L
            (*p).ubrr0h.write(|w| w.bits((UBRR >> 8) as u8));
            (*p).ubrr0l.write(|w| w.bits(UBRR as u8));

            // 8 data bits, no parity, 1 stop bit
            (*p).ucsr0c.write(|w| w.bits(0x06));

            // Receiver and transmitter on, no interrupts
            (*p).ucsr0b.write(|w| w.bits(0x18));
        }
        Self { _private: () }
    }
}

impl Default for Uart0 {
    fn default() -> Self {
        Self::new()
    }
}

impl Read<u8> for Uart0 {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        unsafe {
            let p = USART0::ptr();
            // RXC0: a byte waits in UDR0
            if (*p).ucsr0a.read().bits() & 0x80 != 0 {
                Ok((*p).udr0.read().bits())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

impl Write<u8> for Uart0 {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        unsafe {
            let p = USART0::ptr();
            // UDRE0: data register free
            if (*p).ucsr0a.read().bits() & 0x20 != 0 {
                (*p).udr0.write(|w| w.bits(byte));
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        unsafe {
            let p = USART0::ptr();
            // TXC0: shift register drained
            if (*p).ucsr0a.read().bits() & 0x40 != 0 {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}
