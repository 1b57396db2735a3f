//! Board-level drivers binding the hardware ports

pub mod calibration;
pub mod photocell;

pub use calibration::EepromThresholds;
pub use photocell::Photocell;
