//! Host command protocol
//!
//! Commands arrive as text lines on the same serial stream that carries
//! measurement output. The first byte of a line selects the command;
//! `S` carries two space-separated threshold values. Unknown lines are
//! dropped and malformed numbers fall back to 0; deployed hosts depend
//! on both quirks.

use embedded_hal::serial;

use crate::config::COMMAND_BUFFER_SIZE;
use crate::console::Console;
use crate::ports::Thresholds;

/// A recognized host command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `D` switches to data mode with raw sample output.
    RawData,
    /// `T` switches to data mode with trigger event output.
    TriggerData,
    /// `S <low> <high>` persists a new hysteresis band.
    SetThresholds(Thresholds),
}

impl Command {
    /// Dispatches a completed line on its first byte, case-sensitively.
    /// Anything unrecognized, including an empty line, is dropped.
    pub fn parse(line: &[u8]) -> Option<Command> {
        match line.first() {
            Some(b'D') => Some(Command::RawData),
            Some(b'T') => Some(Command::TriggerData),
            Some(b'S') => Some(Command::SetThresholds(parse_threshold_pair(&line[1..]))),
            _ => None,
        }
    }
}

/// Extracts `<low> <high>` from the bytes following the `S`.
fn parse_threshold_pair(args: &[u8]) -> Thresholds {
    let (low, rest) = next_token(args);
    let (high, _) = next_token(rest);
    Thresholds {
        low: decimal_or_zero(low),
        high: decimal_or_zero(high),
    }
}

/// Skips leading spaces and splits off the next run of non-space bytes.
fn next_token(bytes: &[u8]) -> (&[u8], &[u8]) {
    let start = bytes
        .iter()
        .position(|byte| *byte != b' ')
        .unwrap_or(bytes.len());
    let bytes = &bytes[start..];
    let end = bytes
        .iter()
        .position(|byte| *byte == b' ')
        .unwrap_or(bytes.len());
    bytes.split_at(end)
}

/// Best-effort decimal conversion. Leading digits are consumed, the
/// first non-digit stops the scan, and no digits at all yields 0.
/// Hosts rely on malformed `S` arguments zeroing the thresholds
/// instead of raising an error.
pub fn decimal_or_zero(token: &[u8]) -> u16 {
    let mut value: u16 = 0;
    for &byte in token {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add((byte - b'0') as u16);
    }
    value
}

/// Bounded accumulator for one command line.
///
/// Bytes beyond the bound are dropped, not buffered; the line still
/// terminates on the next `\n` or `\r`.
pub struct CommandReader {
    buf: [u8; COMMAND_BUFFER_SIZE],
    len: usize,
}

impl CommandReader {
    pub fn new() -> Self {
        Self {
            buf: [0; COMMAND_BUFFER_SIZE],
            len: 0,
        }
    }

    /// Busy-polls the console until a line terminator arrives, echoing
    /// every received byte for interactive use. Returns the accumulated
    /// line without its terminator.
    pub fn read_line<T>(&mut self, console: &mut Console<T>) -> &[u8]
    where
        T: serial::Read<u8> + serial::Write<u8>,
    {
        loop {
            let byte = console.read_byte_blocking();
            console.write_byte(byte);
            if byte == b'\n' || byte == b'\r' {
                return &self.buf[..self.len];
            }
            if self.len < self.buf.len() {
                self.buf[self.len] = byte;
                self.len += 1;
            }
        }
    }

    /// Resets the buffer for the next line, dispatched or not.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for CommandReader {
    fn default() -> Self {
        Self::new()
    }
}
