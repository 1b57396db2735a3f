//! Application loop
//!
//! Single-threaded mode dispatcher. Command mode blocks on the console
//! for one line at a time; data mode polls for the mode-switch byte and
//! then takes one measurement per iteration. There is no timer and no
//! sleep, so the effective sample rate is whatever the loop and the
//! transport sustain.

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial::{Read, Write};

use crate::config;
use crate::console::Console;
use crate::ports::{LightSensor, ThresholdStore, Thresholds};
use crate::protocol::{Command, CommandReader};
use crate::trigger::{Edge, TriggerDetector};

/// Whether incoming bytes are command text or a mode-switch signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatingMode {
    Command,
    Data,
}

/// What data mode emits each iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOutputMode {
    Raw,
    Trigger,
}

/// The whole device state, owned by the main loop.
pub struct Application<T, S, N, L> {
    console: Console<T>,
    sensor: S,
    store: N,
    led: L,
    detector: TriggerDetector,
    reader: CommandReader,
    mode: OperatingMode,
    output: DataOutputMode,
}

impl<T, S, N, L> Application<T, S, N, L>
where
    T: Read<u8> + Write<u8>,
    S: LightSensor,
    N: ThresholdStore,
    L: OutputPin,
{
    /// Loads the persisted calibration and boots straight into trigger
    /// output. The host sends `C` to reach the command prompt.
    pub fn new(
        console: Console<T>,
        sensor: S,
        mut store: N,
        mut led: L,
        pulses_to_skip: u16,
    ) -> Self {
        let thresholds = store.load();
        led.set_low().ok();
        Self {
            console,
            sensor,
            store,
            led,
            detector: TriggerDetector::new(thresholds, pulses_to_skip),
            reader: CommandReader::new(),
            mode: OperatingMode::Data,
            output: DataOutputMode::Trigger,
        }
    }

    /// Boot banner plus the calibration readout.
    pub fn announce(&mut self) {
        self.console.write_line(config::BOOT_BANNER);
        let thresholds = self.detector.thresholds();
        self.report_thresholds(thresholds);
    }

    pub fn run(&mut self) -> ! {
        self.announce();
        loop {
            self.tick();
        }
    }

    /// One iteration of the main loop.
    pub fn tick(&mut self) {
        if self.mode == OperatingMode::Command {
            self.console.write_byte(b'>');
            let command = Command::parse(self.reader.read_line(&mut self.console));
            self.reader.clear();
            self.apply(command);
            // a D or T dispatch falls through and measures this same
            // iteration
        }

        if self.mode == OperatingMode::Data {
            if let Some(byte) = self.console.read_byte() {
                if byte == b'C' {
                    self.mode = OperatingMode::Command;
                    // skip the measurement this iteration
                    return;
                }
            }
            let level = self.sensor.read_level();
            match self.output {
                DataOutputMode::Raw => self.console.write_u16_line(level),
                DataOutputMode::Trigger => self.report_edge(level),
            }
        }
    }

    fn apply(&mut self, command: Option<Command>) {
        match command {
            Some(Command::RawData) => {
                self.mode = OperatingMode::Data;
                self.output = DataOutputMode::Raw;
            }
            Some(Command::TriggerData) => {
                self.mode = OperatingMode::Data;
                self.output = DataOutputMode::Trigger;
            }
            Some(Command::SetThresholds(thresholds)) => {
                self.store.store(thresholds);
                let stored = self.store.load();
                self.detector.set_thresholds(stored);
                self.report_thresholds(stored);
            }
            None => {}
        }
    }

    fn report_edge(&mut self, level: u16) {
        match self.detector.update(level) {
            // hosts expect the legacy analog-meter polarity: 0 marks
            // the light coming on, 1 marks it going off
            Some(Edge::Rising) => {
                self.led.set_high().ok();
                self.console.write_line("0");
            }
            Some(Edge::Falling) => {
                self.led.set_low().ok();
                self.console.write_line("1");
            }
            None => {}
        }
    }

    fn report_thresholds(&mut self, thresholds: Thresholds) {
        self.console.write_line("trigger levels:");
        self.console.write_u16(thresholds.low);
        self.console.write_byte(b' ');
        self.console.write_u16(thresholds.high);
        self.console.write_str("\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal_mock::serial::{Mock as SerialMock, Transaction as SerialTransaction};

    struct FakeSensor {
        levels: Vec<u16>,
        reads: usize,
    }

    impl FakeSensor {
        fn new(levels: &[u16]) -> Self {
            Self {
                levels: levels.to_vec(),
                reads: 0,
            }
        }
    }

    impl LightSensor for FakeSensor {
        fn read_level(&mut self) -> u16 {
            let level = self.levels[self.reads.min(self.levels.len() - 1)];
            self.reads += 1;
            level
        }
    }

    struct FakeStore {
        low: u16,
        high: u16,
    }

    impl ThresholdStore for FakeStore {
        fn load(&mut self) -> Thresholds {
            Thresholds {
                low: self.low,
                high: self.high,
            }
        }

        fn store(&mut self, thresholds: Thresholds) {
            self.low = thresholds.low;
            self.high = thresholds.high;
        }
    }

    struct FakeLed {
        history: Vec<bool>,
    }

    impl FakeLed {
        fn new() -> Self {
            Self {
                history: Vec::new(),
            }
        }
    }

    impl OutputPin for FakeLed {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.history.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.history.push(true);
            Ok(())
        }
    }

    type TestApp = Application<SerialMock<u8>, FakeSensor, FakeStore, FakeLed>;

    fn application(
        serial: SerialMock<u8>,
        levels: &[u16],
        store: FakeStore,
        pulses_to_skip: u16,
    ) -> TestApp {
        Application::new(
            Console::new(serial),
            FakeSensor::new(levels),
            store,
            FakeLed::new(),
            pulses_to_skip,
        )
    }

    fn push_writes(transactions: &mut Vec<SerialTransaction<u8>>, bytes: &[u8]) {
        for &byte in bytes {
            transactions.push(SerialTransaction::write(byte));
        }
    }

    fn push_echo(transactions: &mut Vec<SerialTransaction<u8>>, bytes: &[u8]) {
        for &byte in bytes {
            transactions.push(SerialTransaction::read(byte));
            transactions.push(SerialTransaction::write(byte));
        }
    }

    fn no_pending_byte(transactions: &mut Vec<SerialTransaction<u8>>) {
        transactions.push(SerialTransaction::read_error(nb::Error::WouldBlock));
    }

    #[test]
    fn boots_into_data_trigger_mode_with_stored_calibration() {
        let mut serial: SerialMock<u8> = SerialMock::new(&[]);
        let app = application(serial.clone(), &[0], FakeStore { low: 85, high: 90 }, 0);
        assert_eq!(app.mode, OperatingMode::Data);
        assert_eq!(app.output, DataOutputMode::Trigger);
        assert_eq!(app.detector.thresholds(), Thresholds { low: 85, high: 90 });
        // indicator starts dark
        assert_eq!(app.led.history, [false]);
        serial.done();
    }

    #[test]
    fn announce_prints_banner_and_calibration() {
        let mut expected = Vec::new();
        push_writes(&mut expected, config::BOOT_BANNER.as_bytes());
        push_writes(&mut expected, b"\r\n");
        push_writes(&mut expected, b"trigger levels:\r\n");
        push_writes(&mut expected, b"85 90\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[0], FakeStore { low: 85, high: 90 }, 0);
        app.announce();
        serial.done();
    }

    #[test]
    fn raw_mode_emits_one_sample_line_per_tick() {
        let mut expected = Vec::new();
        no_pending_byte(&mut expected);
        push_writes(&mut expected, b"512\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[512], FakeStore { low: 85, high: 90 }, 0);
        app.output = DataOutputMode::Raw;
        app.tick();
        assert_eq!(app.sensor.reads, 1);
        serial.done();
    }

    #[test]
    fn c_byte_enters_command_mode_and_skips_the_sample() {
        let mut serial = SerialMock::new(&[SerialTransaction::read(b'C')]);
        let mut app = application(serial.clone(), &[512], FakeStore { low: 85, high: 90 }, 0);
        app.tick();
        assert_eq!(app.mode, OperatingMode::Command);
        assert_eq!(app.sensor.reads, 0);
        serial.done();
    }

    #[test]
    fn other_pending_bytes_are_discarded_before_sampling() {
        let mut expected = Vec::new();
        expected.push(SerialTransaction::read(b'x'));
        push_writes(&mut expected, b"512\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[512], FakeStore { low: 85, high: 90 }, 0);
        app.output = DataOutputMode::Raw;
        app.tick();
        assert_eq!(app.mode, OperatingMode::Data);
        assert_eq!(app.sensor.reads, 1);
        serial.done();
    }

    #[test]
    fn command_d_starts_raw_output_in_the_same_iteration() {
        let mut expected = Vec::new();
        push_writes(&mut expected, b">");
        push_echo(&mut expected, b"D\n");
        no_pending_byte(&mut expected);
        push_writes(&mut expected, b"512\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[512], FakeStore { low: 85, high: 90 }, 0);
        app.mode = OperatingMode::Command;
        app.tick();
        assert_eq!(app.mode, OperatingMode::Data);
        assert_eq!(app.output, DataOutputMode::Raw);
        serial.done();
    }

    #[test]
    fn command_t_starts_trigger_output() {
        let mut expected = Vec::new();
        push_writes(&mut expected, b">");
        push_echo(&mut expected, b"T\n");
        no_pending_byte(&mut expected);
        // 85 sits inside the dead zone, so nothing is emitted
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[85], FakeStore { low: 80, high: 100 }, 0);
        app.mode = OperatingMode::Command;
        app.output = DataOutputMode::Raw;
        app.tick();
        assert_eq!(app.output, DataOutputMode::Trigger);
        assert_eq!(app.sensor.reads, 1);
        serial.done();
    }

    #[test]
    fn set_command_persists_reloads_and_confirms() {
        let mut expected = Vec::new();
        push_writes(&mut expected, b">");
        push_echo(&mut expected, b"S 40 60\n");
        push_writes(&mut expected, b"trigger levels:\r\n");
        push_writes(&mut expected, b"40 60\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[0], FakeStore { low: 85, high: 90 }, 0);
        app.mode = OperatingMode::Command;
        app.tick();
        // S leaves the device at the prompt
        assert_eq!(app.mode, OperatingMode::Command);
        assert_eq!(app.store.low, 40);
        assert_eq!(app.store.high, 60);
        assert_eq!(app.detector.thresholds(), Thresholds { low: 40, high: 60 });
        serial.done();
    }

    #[test]
    fn unrecognized_command_changes_nothing_and_reprompts() {
        let mut expected = Vec::new();
        push_writes(&mut expected, b">");
        push_echo(&mut expected, b"X 1 2\n");
        push_writes(&mut expected, b">");
        push_echo(&mut expected, b"D\n");
        no_pending_byte(&mut expected);
        push_writes(&mut expected, b"512\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[512], FakeStore { low: 85, high: 90 }, 0);
        app.mode = OperatingMode::Command;
        app.tick();
        assert_eq!(app.mode, OperatingMode::Command);
        assert_eq!(app.store.low, 85);
        app.tick();
        assert_eq!(app.output, DataOutputMode::Raw);
        serial.done();
    }

    #[test]
    fn boot_then_command_then_raw_scenario() {
        let mut expected = Vec::new();
        push_writes(&mut expected, config::BOOT_BANNER.as_bytes());
        push_writes(&mut expected, b"\r\n");
        push_writes(&mut expected, b"trigger levels:\r\n");
        push_writes(&mut expected, b"85 90\r\n");
        // C interrupts data mode
        expected.push(SerialTransaction::read(b'C'));
        // prompt, then D switches to raw output
        push_writes(&mut expected, b">");
        push_echo(&mut expected, b"D\n");
        no_pending_byte(&mut expected);
        push_writes(&mut expected, b"512\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(serial.clone(), &[512], FakeStore { low: 85, high: 90 }, 0);
        app.announce();
        app.tick();
        assert_eq!(app.mode, OperatingMode::Command);
        app.tick();
        assert_eq!(app.output, DataOutputMode::Raw);
        serial.done();
    }

    #[test]
    fn trigger_edges_drive_led_and_inverted_payload() {
        let mut expected = Vec::new();
        no_pending_byte(&mut expected);
        // rising edge, light on
        push_writes(&mut expected, b"0\r\n");
        no_pending_byte(&mut expected);
        // falling edge, light off
        push_writes(&mut expected, b"1\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(
            serial.clone(),
            &[120, 50],
            FakeStore { low: 80, high: 100 },
            0,
        );
        app.tick();
        app.tick();
        assert_eq!(app.led.history, [false, true, false]);
        serial.done();
    }

    #[test]
    fn quiet_samples_emit_nothing_in_trigger_mode() {
        let mut expected = Vec::new();
        no_pending_byte(&mut expected);
        no_pending_byte(&mut expected);
        let mut serial = SerialMock::new(&expected);
        let mut app = application(
            serial.clone(),
            &[85, 90],
            FakeStore { low: 80, high: 100 },
            0,
        );
        app.tick();
        app.tick();
        assert_eq!(app.sensor.reads, 2);
        serial.done();
    }

    #[test]
    fn decimation_applies_through_the_loop() {
        let mut expected = Vec::new();
        for tick in 0..6 {
            no_pending_byte(&mut expected);
            if tick == 3 {
                push_writes(&mut expected, b"0\r\n");
            }
            if tick == 4 {
                push_writes(&mut expected, b"1\r\n");
            }
        }
        let mut serial = SerialMock::new(&expected);
        let mut app = application(
            serial.clone(),
            &[50, 120, 50, 120, 50, 120],
            FakeStore { low: 80, high: 100 },
            1,
        );
        for _ in 0..6 {
            app.tick();
        }
        assert_eq!(app.led.history, [false, true, false]);
        serial.done();
    }

    #[test]
    fn pulse_state_survives_command_mode_round_trip() {
        let mut expected = Vec::new();
        // first pulse swallowed by decimation
        no_pending_byte(&mut expected);
        // C interrupts sampling
        expected.push(SerialTransaction::read(b'C'));
        // T returns to trigger output in the same iteration
        push_writes(&mut expected, b">");
        push_echo(&mut expected, b"T\n");
        no_pending_byte(&mut expected);
        // second pulse clears the window only if the count survived
        no_pending_byte(&mut expected);
        push_writes(&mut expected, b"0\r\n");
        let mut serial = SerialMock::new(&expected);
        let mut app = application(
            serial.clone(),
            &[120, 50, 120],
            FakeStore { low: 80, high: 100 },
            1,
        );
        app.tick();
        app.tick();
        assert_eq!(app.mode, OperatingMode::Command);
        // swallowed falling edge: the count carries over the mode switch
        app.tick();
        assert_eq!(app.output, DataOutputMode::Trigger);
        app.tick();
        assert_eq!(app.led.history, [false, true]);
        serial.done();
    }
}
