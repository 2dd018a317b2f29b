#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;

use irrigo::{
    config::CYCLE_PERIOD_MS,
    hardware::{self, BoardController, Dht22Hardware, LightSensorHardware},
    logic::should_irrigate,
    model::{CycleReport, Reading},
    traits::{Actuator, HumiditySensor, LightSensor, PresenceInput},
};

esp_bootloader_esp_idf::esp_app_desc!();

/// Pass/fail tally printed over the console.
#[derive(Default)]
struct Checks {
    passed: u32,
    failed: u32,
}

impl Checks {
    fn check(&mut self, ok: bool, name: &str) {
        if ok {
            self.passed += 1;
            esp_println::println!("  PASS {}", name);
        } else {
            self.failed += 1;
            esp_println::println!("  FAIL {}", name);
        }
    }

    fn check_eq<T: PartialEq + core::fmt::Debug>(&mut self, got: T, want: T, name: &str) {
        let ok = got == want;
        self.check(ok, name);
        if !ok {
            esp_println::println!("       got {:?}, want {:?}", got, want);
        }
    }

    fn check_within(&mut self, got: u64, want: u64, tolerance: u64, name: &str) {
        let ok = got.abs_diff(want) <= tolerance;
        self.check(ok, name);
        if !ok {
            esp_println::println!("       got {}, want {} +/- {}", got, want, tolerance);
        }
    }

    fn report(&self) {
        esp_println::println!(
            "\n[SUMMARY] {} passed, {} failed of {}",
            self.passed,
            self.failed,
            self.passed + self.failed
        );
    }
}

fn reading(humidity: f32, phosphorus: bool, potassium: bool, light: u16) -> Reading {
    Reading {
        phosphorus_present: phosphorus,
        potassium_present: potassium,
        light_reading: light,
        humidity,
    }
}

fn check_decision_logic(checks: &mut Checks) {
    esp_println::println!("\n[TEST] decision rule");

    let dry = reading(55.0, true, true, 1200);

    checks.check(should_irrigate(&dry), "dry, fertile, bright irrigates");
    checks.check(
        !should_irrigate(&reading(65.0, true, true, 1200)),
        "humid soil does not irrigate",
    );
    checks.check(
        !should_irrigate(&reading(55.0, false, true, 1200)),
        "missing phosphorus does not irrigate",
    );
    checks.check(
        !should_irrigate(&reading(55.0, true, true, 1000)),
        "light at threshold does not irrigate",
    );
    checks.check(
        !should_irrigate(&reading(f32::NAN, true, true, 1200)),
        "invalid humidity does not irrigate",
    );

    let report = CycleReport {
        reading: dry,
        irrigate: true,
    };
    checks.check_eq(
        report.status_line().as_str(),
        "Fosforo:1,Potassio:1,pH:1200,Umidade:55.00,Irrigacao:1",
        "status line format",
    );
}

async fn check_sensors(
    checks: &mut Checks,
    light: &mut LightSensorHardware<'_>,
    dht: &mut Dht22Hardware<'_>,
) {
    esp_println::println!("\n[TEST] sensors");

    match light.read_light() {
        Ok(value) => {
            esp_println::println!("    light: {}", value);
            checks.check(value <= 4095, "light reading within 12-bit range");
        }
        Err(e) => {
            esp_println::println!("    light read failed: {}", e);
            checks.check(false, "light reading");
        }
    }

    let mut valid = 0;
    for i in 0..3 {
        Timer::after(Duration::from_millis(CYCLE_PERIOD_MS)).await;
        match dht.read_humidity() {
            Ok(humidity) => {
                esp_println::println!("    humidity #{}: {:.1}%RH", i + 1, humidity);
                checks.check(
                    (0.0..=100.0).contains(&humidity),
                    "humidity in 0..=100 %RH",
                );
                valid += 1;
            }
            Err(e) => esp_println::println!("    humidity #{} failed: {}", i + 1, e),
        }
    }
    checks.check_eq(valid, 3, "three humidity reads succeed");
}

/// Run the production loop body twice and measure the gap between the two
/// status lines.
async fn check_cycle_period(checks: &mut Checks, controller: &mut BoardController<'_>) {
    esp_println::println!("\n[TEST] cycle period");

    let mut printed_at = [Instant::now(); 2];
    for slot in printed_at.iter_mut() {
        let report = controller.run_cycle();
        esp_println::println!("{}", report.status_line());
        *slot = Instant::now();

        Timer::after(Duration::from_millis(CYCLE_PERIOD_MS)).await;
    }

    let gap_ms = (printed_at[1] - printed_at[0]).as_millis();
    checks.check_within(gap_ms, CYCLE_PERIOD_MS, 100, "status lines ~2 s apart");
    checks.check_eq(controller.cycles(), 2, "two cycles counted");
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_println::println!("=== irrigo hardware checks ===");

    let mut checks = Checks::default();
    check_decision_logic(&mut checks);

    let mut phosphorus = hardware::presence_input(peripherals.GPIO12);
    let mut potassium = hardware::presence_input(peripherals.GPIO14);
    let mut light = LightSensorHardware::new(peripherals.ADC1, peripherals.GPIO4);
    let mut dht = Dht22Hardware::new(peripherals.GPIO17);
    let mut pump = hardware::actuator_output(peripherals.GPIO16);
    let mut led = hardware::actuator_output(peripherals.GPIO2);

    // Initialize RTOS timer for embassy (this consumes TIMG0)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    esp_println::println!("\n[TEST] presence inputs (leave buttons released)");
    checks.check_eq(phosphorus.is_present(), Ok(false), "phosphorus idle reads absent");
    checks.check_eq(potassium.is_present(), Ok(false), "potassium idle reads absent");

    check_sensors(&mut checks, &mut light, &mut dht).await;

    esp_println::println!("\n[TEST] actuators (relay clicks, LED blinks)");
    checks.check(pump.set_active(true).is_ok() && pump.is_active(), "pump relay on");
    checks.check(led.set_active(true).is_ok() && led.is_active(), "status LED on");
    Timer::after(Duration::from_millis(500)).await;
    checks.check(pump.set_active(false).is_ok() && !pump.is_active(), "pump relay off");
    checks.check(led.set_active(false).is_ok() && !led.is_active(), "status LED off");

    let mut controller = BoardController::new(phosphorus, potassium, light, dht, pump, led);
    check_cycle_period(&mut checks, &mut controller).await;

    checks.report();

    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}
