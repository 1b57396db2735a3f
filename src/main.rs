#![no_std]
#![no_main]

use panic_halt as _;

use meterpulse::application::Application;
use meterpulse::config;
use meterpulse::console::Console;
use meterpulse::drivers::{EepromThresholds, Photocell};
use meterpulse::hal::{Adc, AdcChannel, Eeprom, Led, Uart0};

#[avr_device::entry]
fn main() -> ! {
    let console = Console::new(Uart0::new());
    let sensor = Photocell::new(Adc::new(), AdcChannel::Adc0);
    let store = EepromThresholds::new(Eeprom::new());
    let led = Led::new(config::LED_PIN);

    let mut app = Application::new(console, sensor, store, led, config::PULSES_TO_SKIP);
    app.run()
}
