//! Photo-transistor sampler

use crate::hal::{Adc, AdcChannel};
use crate::ports::LightSensor;

/// The photo-transistor divider on one ADC input.
pub struct Photocell {
    adc: Adc,
    channel: AdcChannel,
}

impl Photocell {
    pub fn new(adc: Adc, channel: AdcChannel) -> Self {
        Self { adc, channel }
    }
}

impl LightSensor for Photocell {
    fn read_level(&mut self) -> u16 {
        self.adc.read_channel(self.channel)
    }
}
