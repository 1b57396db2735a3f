//! Photo-transistor pulse trigger firmware for utility meter LEDs
//!
//! A photo-transistor taped over a utility meter's impulse LED feeds an
//! ADC input; this firmware turns the samples into debounced, decimated
//! edge events on a 9600 baud serial link. The host flips the device
//! between command mode (line-oriented `D`/`T`/`S` protocol behind a
//! `>` prompt) and data mode (raw samples or `0`/`1` trigger events) on
//! the same stream.
//!
//! The crate splits along the hardware seam:
//!
//! - the portable core ([`trigger`], [`protocol`], [`console`],
//!   [`application`]) reaches hardware only through the [`ports`]
//!   traits and the `embedded-hal` serial and pin traits, so the whole
//!   control loop runs in host tests;
//! - the ATmega128 register layer (`hal`) and the board drivers
//!   (`drivers`) sit behind the `atmega128` feature;
//! - the firmware binary in `src/main.rs` wires the two together and
//!   only builds for AVR targets.

#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod console;
pub mod ports;
pub mod protocol;
pub mod trigger;

#[cfg(feature = "atmega128")]
pub mod drivers;
#[cfg(feature = "atmega128")]
pub mod hal;

pub use application::{Application, DataOutputMode, OperatingMode};
pub use console::Console;
pub use ports::{LightSensor, ThresholdStore, Thresholds};
pub use protocol::{Command, CommandReader};
pub use trigger::{Edge, TriggerDetector};
