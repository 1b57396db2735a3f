//! Hardware ports for the control loop
//!
//! The application core reaches the sampler and the calibration store
//! only through these traits. Host tests substitute in-memory
//! implementations; the `drivers` module provides the ATmega128 ones.

/// Calibration pair bounding the trigger detector's hysteresis band.
///
/// `low <= high` is the sane configuration but is not enforced
/// anywhere; an inverted pair is stored as-is and the detector keeps
/// defined behavior for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub low: u16,
    pub high: u16,
}

/// Port for the photo-transistor sampler.
///
/// Readings are instantaneous light levels in the converter's range,
/// 0-1023 on the 10-bit reference hardware. Sampling never fails.
pub trait LightSensor {
    fn read_level(&mut self) -> u16;
}

/// Port for the persisted threshold pair.
///
/// Erased storage reads back as all-ones (65535 per word), which leaves
/// a factory-fresh detector inactive until an `S` command calibrates it.
/// The two words are written independently, so a power loss between the
/// writes can leave a mixed pair behind.
pub trait ThresholdStore {
    fn load(&mut self) -> Thresholds;
    fn store(&mut self, thresholds: Thresholds);
}
