use esp_hal::gpio::AnyPin;
use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcConfig, AdcPin, Attenuation},
    delay::Delay,
    gpio::{DriveMode, Flex, Input, InputConfig, Level, Output, OutputConfig, Pull},
    peripherals::{ADC1, GPIO4},
};

use crate::dht22::Dht22;
use crate::error::SensorError;
use crate::logic::IrrigationController;
use crate::traits::{ActiveLow, HumiditySensor, LightSensor, PinActuator};

/// Controller wired to the ESP32-S3 peripherals.
pub type BoardController<'a> = IrrigationController<
    ActiveLow<Input<'a>>,
    ActiveLow<Input<'a>>,
    LightSensorHardware<'a>,
    Dht22Hardware<'a>,
    PinActuator<Output<'a>>,
    PinActuator<Output<'a>>,
>;

/// Push-button presence input with the internal pull-up enabled.
pub fn presence_input<'a, PIN>(gpio: PIN) -> ActiveLow<Input<'a>>
where
    PIN: Into<AnyPin<'a>>,
{
    let config = InputConfig::default().with_pull(Pull::Up);
    ActiveLow::new(Input::new(gpio.into(), config))
}

/// Push-pull output that starts low (pump off, LED off).
pub fn actuator_output<'a, PIN>(gpio: PIN) -> PinActuator<Output<'a>>
where
    PIN: Into<AnyPin<'a>>,
{
    PinActuator::new(Output::new(gpio.into(), Level::Low, OutputConfig::default()))
}

/// Light sensor divider on GPIO4 (ADC1 channel 3), 12-bit one-shot
/// conversions with 11 dB attenuation for the full 0..3.3 V swing.
pub struct LightSensorHardware<'a> {
    adc: Adc<'a, ADC1<'a>, Blocking>,
    pin: AdcPin<GPIO4<'a>, ADC1<'a>>,
}

impl<'a> LightSensorHardware<'a> {
    pub fn new(adc_periph: ADC1<'a>, gpio: GPIO4<'a>) -> Self {
        let mut config = AdcConfig::new();
        let pin = config.enable_pin(gpio, Attenuation::_11dB);
        let adc = Adc::new(adc_periph, config);

        Self { adc, pin }
    }
}

impl LightSensor for LightSensorHardware<'_> {
    fn read_light(&mut self) -> Result<u16, SensorError> {
        nb::block!(self.adc.read_oneshot(&mut self.pin)).map_err(|_| SensorError::Adc)
    }
}

/// DHT22 on an open-drain GPIO with the internal pull-up.
pub struct Dht22Hardware<'a> {
    sensor: Dht22<Flex<'a>, Delay>,
}

impl<'a> Dht22Hardware<'a> {
    pub fn new<PIN>(gpio: PIN) -> Self
    where
        PIN: Into<AnyPin<'a>>,
    {
        let mut pin = Flex::new(gpio.into());
        pin.apply_output_config(
            &OutputConfig::default()
                .with_drive_mode(DriveMode::OpenDrain)
                .with_pull(Pull::Up),
        );
        pin.set_high();
        pin.set_output_enable(true);
        pin.set_input_enable(true);

        Self {
            sensor: Dht22::new(pin, Delay::new()),
        }
    }
}

impl HumiditySensor for Dht22Hardware<'_> {
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        // Bit timing is lost if an interrupt lands mid-frame.
        let result = critical_section::with(|_| self.sensor.read());
        let measurement = result?;
        log::debug!(
            "[DHT22] {:.1}%RH {:.1}C",
            measurement.humidity,
            measurement.temperature
        );
        Ok(measurement.humidity)
    }
}
