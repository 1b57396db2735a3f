//! Trigger detection for the meter's impulse LED
//!
//! Two-threshold hysteresis turns noisy photo-transistor samples into a
//! clean light/dark state, and pulse-skip decimation thins the reported
//! edge rate for fast-blinking meters.

use crate::ports::Thresholds;

/// A reported transition of the light signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Hysteresis edge detector with pulse-skip decimation.
///
/// Samples strictly above `high` force the active state, samples
/// strictly below `low` force inactive, and the band in between holds
/// the current state so noise around a single cutoff cannot chatter.
///
/// The pulse count tracks rising edges since the last reported falling
/// edge. Edges are reported only once the count exceeds the skip
/// setting; the count resets on a reported falling edge and nowhere
/// else, so swallowed pulse pairs keep accumulating toward the next
/// report.
pub struct TriggerDetector {
    thresholds: Thresholds,
    pulses_to_skip: u16,
    active: bool,
    pulse_count: u16,
}

impl TriggerDetector {
    /// Starts in the inactive (dark) state with an empty pulse count.
    pub fn new(thresholds: Thresholds, pulses_to_skip: u16) -> Self {
        Self {
            thresholds,
            pulses_to_skip,
            active: false,
            pulse_count: 0,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Replaces the hysteresis band. Detector state survives, so a
    /// recalibration mid-pulse-train does not lose counted pulses.
    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    /// Feeds one sample through the state machine.
    ///
    /// Returns the edge to report, if this sample both flipped the
    /// state and cleared the decimation window.
    pub fn update(&mut self, sample: u16) -> Option<Edge> {
        let next_active = if sample > self.thresholds.high {
            true
        } else if sample < self.thresholds.low {
            false
        } else {
            self.active
        };

        if next_active == self.active {
            return None;
        }
        self.active = next_active;

        if next_active {
            self.pulse_count = self.pulse_count.saturating_add(1);
            if self.pulse_count > self.pulses_to_skip {
                return Some(Edge::Rising);
            }
        } else if self.pulse_count > self.pulses_to_skip {
            self.pulse_count = 0;
            return Some(Edge::Falling);
        }
        None
    }
}
