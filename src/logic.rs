//! Business logic layer (hardware-independent)

use crate::config::{HUMIDITY_THRESHOLD_PCT, LIGHT_THRESHOLD};
use crate::model::{CycleReport, Reading};
use crate::traits::{Actuator, HumiditySensor, LightSensor, PresenceInput};

/// Irrigate only when the soil air is dry, both nutrients are present and
/// the light reading is high enough. An invalid (NaN) humidity never passes.
pub fn should_irrigate(reading: &Reading) -> bool {
    reading.humidity < HUMIDITY_THRESHOLD_PCT
        && reading.phosphorus_present
        && reading.potassium_present
        && reading.light_reading > LIGHT_THRESHOLD
}

/// The sensors and outputs driven by one control cycle.
pub struct IrrigationController<P, K, L, H, R, S> {
    phosphorus: P,
    potassium: K,
    light: L,
    humidity: H,
    pump: R,
    led: S,
    cycles: u32,
}

impl<P, K, L, H, R, S> IrrigationController<P, K, L, H, R, S>
where
    P: PresenceInput,
    K: PresenceInput,
    L: LightSensor,
    H: HumiditySensor,
    R: Actuator,
    S: Actuator,
{
    pub fn new(phosphorus: P, potassium: K, light: L, humidity: H, pump: R, led: S) -> Self {
        Self {
            phosphorus,
            potassium,
            light,
            humidity,
            pump,
            led,
            cycles: 0,
        }
    }

    /// Sample every input once. Failed reads degrade to values that keep the
    /// pump off.
    pub fn acquire(&mut self) -> Reading {
        let phosphorus_present = self.phosphorus.is_present().unwrap_or_else(|e| {
            log::debug!("phosphorus input: {}", e);
            false
        });
        let potassium_present = self.potassium.is_present().unwrap_or_else(|e| {
            log::debug!("potassium input: {}", e);
            false
        });
        let light_reading = self.light.read_light().unwrap_or_else(|e| {
            log::debug!("light sensor: {}", e);
            0
        });
        let humidity = self.humidity.read_humidity().unwrap_or_else(|e| {
            log::debug!("humidity sensor: {}", e);
            f32::NAN
        });

        Reading {
            phosphorus_present,
            potassium_present,
            light_reading,
            humidity,
        }
    }

    /// Drive the pump relay and the status LED to `irrigate`.
    pub fn apply(&mut self, irrigate: bool) {
        if let Err(e) = self.pump.set_active(irrigate) {
            log::debug!("pump relay: {}", e);
        }
        if let Err(e) = self.led.set_active(irrigate) {
            log::debug!("status LED: {}", e);
        }
    }

    /// Acquire, decide and actuate.
    pub fn run_cycle(&mut self) -> CycleReport {
        let reading = self.acquire();
        let irrigate = should_irrigate(&reading);
        self.apply(irrigate);

        self.cycles = self.cycles.wrapping_add(1);
        log::debug!("cycle {} irrigate={}", self.cycles, irrigate);

        CycleReport { reading, irrigate }
    }

    /// Completed cycles since boot
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn pump(&self) -> &R {
        &self.pump
    }

    pub fn led(&self) -> &S {
        &self.led
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ActuatorError, SensorError};
    use std::cell::Cell;
    use std::sync::Once;

    #[derive(Clone, Copy)]
    struct Fixed<T>(Result<T, SensorError>);

    impl PresenceInput for Fixed<bool> {
        fn is_present(&mut self) -> Result<bool, SensorError> {
            self.0
        }
    }

    impl LightSensor for Fixed<u16> {
        fn read_light(&mut self) -> Result<u16, SensorError> {
            self.0
        }
    }

    impl HumiditySensor for Fixed<f32> {
        fn read_humidity(&mut self) -> Result<f32, SensorError> {
            self.0
        }
    }

    #[derive(Default)]
    struct Recorder {
        active: bool,
        writes: u32,
        broken: bool,
    }

    impl Actuator for Recorder {
        fn set_active(&mut self, active: bool) -> Result<(), ActuatorError> {
            if self.broken {
                return Err(ActuatorError::Gpio);
            }
            self.active = active;
            self.writes += 1;
            Ok(())
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    type TestController =
        IrrigationController<Fixed<bool>, Fixed<bool>, Fixed<u16>, Fixed<f32>, Recorder, Recorder>;

    fn controller(humidity: f32, phosphorus: bool, potassium: bool, light: u16) -> TestController {
        IrrigationController::new(
            Fixed(Ok(phosphorus)),
            Fixed(Ok(potassium)),
            Fixed(Ok(light)),
            Fixed(Ok(humidity)),
            Recorder::default(),
            Recorder::default(),
        )
    }

    fn reading(humidity: f32, phosphorus: bool, potassium: bool, light: u16) -> Reading {
        Reading {
            phosphorus_present: phosphorus,
            potassium_present: potassium,
            light_reading: light,
            humidity,
        }
    }

    #[test]
    fn dry_fertile_bright_soil_irrigates() {
        let mut ctrl = controller(55.0, true, true, 1200);
        let report = ctrl.run_cycle();

        assert!(report.irrigate);
        assert!(ctrl.pump().is_active());
        assert!(ctrl.led().is_active());
        assert!(report.status_line().ends_with("Irrigacao:1"));
    }

    #[test]
    fn humid_soil_does_not_irrigate() {
        let mut ctrl = controller(65.0, true, true, 1200);
        assert!(!ctrl.run_cycle().irrigate);
        assert!(!ctrl.pump().is_active());
        assert!(!ctrl.led().is_active());
    }

    #[test]
    fn missing_phosphorus_does_not_irrigate() {
        let mut ctrl = controller(55.0, false, true, 1200);
        let report = ctrl.run_cycle();
        assert!(!report.irrigate);
        assert!(report.status_line().ends_with("Irrigacao:0"));
    }

    #[test]
    fn thresholds_are_strict() {
        assert!(!should_irrigate(&reading(60.0, true, true, 1200)));
        assert!(should_irrigate(&reading(59.99, true, true, 1200)));
        assert!(!should_irrigate(&reading(55.0, true, true, 1000)));
        assert!(should_irrigate(&reading(55.0, true, true, 1001)));
    }

    #[test]
    fn invalid_humidity_fails_safe() {
        assert!(!should_irrigate(&reading(f32::NAN, true, true, 4095)));
    }

    #[test]
    fn humidity_read_error_reports_nan() {
        let mut ctrl = IrrigationController::new(
            Fixed(Ok(true)),
            Fixed(Ok(true)),
            Fixed(Ok(2000u16)),
            Fixed::<f32>(Err(SensorError::Timeout)),
            Recorder::default(),
            Recorder::default(),
        );
        let report = ctrl.run_cycle();
        assert!(!report.reading.humidity_valid());
        assert!(!report.irrigate);
        assert_eq!(
            report.status_line().as_str(),
            "Fosforo:1,Potassio:1,pH:2000,Umidade:nan,Irrigacao:0"
        );
    }

    #[test]
    fn input_read_errors_keep_pump_off() {
        let mut ctrl = IrrigationController::new(
            Fixed::<bool>(Err(SensorError::Gpio)),
            Fixed(Ok(true)),
            Fixed::<u16>(Err(SensorError::Adc)),
            Fixed(Ok(40.0f32)),
            Recorder::default(),
            Recorder::default(),
        );
        let reading = ctrl.acquire();
        assert!(!reading.phosphorus_present);
        assert_eq!(reading.light_reading, 0);
        assert!(!ctrl.run_cycle().irrigate);
    }

    #[test]
    fn both_outputs_written_every_cycle() {
        let mut ctrl = controller(55.0, true, true, 1200);
        for _ in 0..3 {
            ctrl.run_cycle();
        }
        assert_eq!(ctrl.cycles(), 3);
        assert_eq!(ctrl.pump().writes, 3);
        assert_eq!(ctrl.led().writes, 3);
    }

    #[test]
    fn broken_relay_still_drives_led() {
        let mut ctrl = IrrigationController::new(
            Fixed(Ok(true)),
            Fixed(Ok(true)),
            Fixed(Ok(1200u16)),
            Fixed(Ok(30.0f32)),
            Recorder {
                broken: true,
                ..Recorder::default()
            },
            Recorder::default(),
        );
        let report = ctrl.run_cycle();
        assert!(report.irrigate);
        assert!(!ctrl.pump().is_active());
        assert!(ctrl.led().is_active());
    }

    // Records per level emitted on the current test thread.
    struct LevelCounter;

    std::thread_local! {
        static CONSOLE_RECORDS: Cell<usize> = const { Cell::new(0) };
        static DEBUG_RECORDS: Cell<usize> = const { Cell::new(0) };
    }

    impl log::Log for LevelCounter {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            let counter = if record.level() <= log::Level::Info {
                &CONSOLE_RECORDS
            } else {
                &DEBUG_RECORDS
            };
            counter.with(|c| c.set(c.get() + 1));
        }

        fn flush(&self) {}
    }

    static LOGGER: LevelCounter = LevelCounter;
    static INSTALL_LOGGER: Once = Once::new();

    fn install_counting_logger() {
        INSTALL_LOGGER.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });
        CONSOLE_RECORDS.with(|c| c.set(0));
        DEBUG_RECORDS.with(|c| c.set(0));
    }

    #[test]
    fn faults_never_log_at_console_level() {
        install_counting_logger();
        let mut ctrl = IrrigationController::new(
            Fixed::<bool>(Err(SensorError::Gpio)),
            Fixed::<bool>(Err(SensorError::Gpio)),
            Fixed::<u16>(Err(SensorError::Adc)),
            Fixed::<f32>(Err(SensorError::Checksum)),
            Recorder {
                broken: true,
                ..Recorder::default()
            },
            Recorder {
                broken: true,
                ..Recorder::default()
            },
        );

        let report = ctrl.run_cycle();

        assert!(!report.irrigate);
        // Only the status line may reach the serial console at the default level.
        assert_eq!(CONSOLE_RECORDS.with(Cell::get), 0);
        assert!(DEBUG_RECORDS.with(Cell::get) >= 6);
    }
}
