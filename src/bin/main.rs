#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;

use irrigo::{
    config::CYCLE_PERIOD_MS,
    hardware::{self, BoardController, Dht22Hardware, LightSensorHardware},
};

esp_bootloader_esp_idf::esp_app_desc!();

// Pin map (ESP32-S3 DevKitC):
// GPIO12 - phosphorus button (to GND, internal pull-up)
// GPIO14 - potassium button (to GND, internal pull-up)
// GPIO4  - LDR divider, ADC1 channel 3
// GPIO17 - DHT22 data
// GPIO16 - pump relay
// GPIO2  - status LED
#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());

    log::debug!("irrigo starting");

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let mut controller = BoardController::new(
        hardware::presence_input(peripherals.GPIO12),
        hardware::presence_input(peripherals.GPIO14),
        LightSensorHardware::new(peripherals.ADC1, peripherals.GPIO4),
        Dht22Hardware::new(peripherals.GPIO17),
        hardware::actuator_output(peripherals.GPIO16),
        hardware::actuator_output(peripherals.GPIO2),
    );

    // DHT22 needs about a second after power-up before the first read.
    Timer::after(Duration::from_secs(1)).await;

    loop {
        let report = controller.run_cycle();
        esp_println::println!("{}", report.status_line());

        Timer::after(Duration::from_millis(CYCLE_PERIOD_MS)).await;
    }
}
