//! Configuration constants for the meterpulse firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Banner printed once at power-up, before the calibration readout
pub const BOOT_BANNER: &str = "meterpulse 0.1.0";

/// Light pulses to swallow between reported trigger edges (decimation)
pub const PULSES_TO_SKIP: u16 = 49;

/// Command line buffer bound; bytes beyond it are dropped
pub const COMMAND_BUFFER_SIZE: usize = 16;

/// EEPROM address of the low trigger threshold word
pub const EEPROM_ADDR_LOW: u16 = 0;

/// EEPROM address of the high trigger threshold word
pub const EEPROM_ADDR_HIGH: u16 = 4;

/// PORTB bit driving the trigger indicator LED
pub const LED_PIN: u8 = 5;
