//! Hardware abstraction traits

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::{ActuatorError, SensorError};

/// Trait for binary nutrient-presence inputs
pub trait PresenceInput {
    /// Whether the nutrient is currently detected
    fn is_present(&mut self) -> Result<bool, SensorError>;
}

/// Trait for the analog light sensor
pub trait LightSensor {
    /// Raw ADC conversion value
    fn read_light(&mut self) -> Result<u16, SensorError>;
}

/// Trait for relative humidity sensors
pub trait HumiditySensor {
    /// Read relative humidity in percent
    fn read_humidity(&mut self) -> Result<f32, SensorError>;
}

/// Trait for on/off outputs (pump relay, status LED)
pub trait Actuator {
    fn set_active(&mut self, active: bool) -> Result<(), ActuatorError>;

    /// Last state successfully written
    fn is_active(&self) -> bool;
}

/// Presence input wired active-low against a pull-up: a low level means present.
pub struct ActiveLow<P> {
    pin: P,
}

impl<P: InputPin> ActiveLow<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> PresenceInput for ActiveLow<P> {
    fn is_present(&mut self) -> Result<bool, SensorError> {
        self.pin.is_low().map_err(|_| SensorError::Gpio)
    }
}

/// Actuator driven high when active.
pub struct PinActuator<P> {
    pin: P,
    active: bool,
}

impl<P: OutputPin> PinActuator<P> {
    /// Takes a pin already driven low.
    pub fn new(pin: P) -> Self {
        Self { pin, active: false }
    }
}

impl<P: OutputPin> Actuator for PinActuator<P> {
    fn set_active(&mut self, active: bool) -> Result<(), ActuatorError> {
        let result = if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| ActuatorError::Gpio)?;
        self.active = active;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
