//! DHT22 (AM2302) single-wire humidity/temperature sensor.
//!
//! The line is open-drain with a pull-up. The host pulls it low for at least
//! 1 ms to request a measurement; the sensor answers with 80 µs low, 80 µs
//! high, then 40 bits. Every bit starts with ~50 µs low; the following high
//! pulse lasts ~27 µs for a 0 and ~70 µs for a 1.
//!
//! Pulse lengths are measured by counting polls, so a bit is decoded by
//! comparing its high phase against its own low phase instead of against an
//! absolute duration.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;
use crate::traits::HumiditySensor;

const START_LOW_US: u32 = 1_200;
const RELEASE_US: u32 = 30;
/// About 1 ms of polling; no valid pulse is longer than 80 µs.
const MAX_POLLS: u32 = 1_000;

pub const FRAME_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Relative humidity, %RH
    pub humidity: f32,
    /// Temperature, °C
    pub temperature: f32,
}

/// Decode a raw `[hum_hi, hum_lo, temp_hi, temp_lo, checksum]` frame.
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Result<Measurement, SensorError> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
    if humidity > 100.0 {
        return Err(SensorError::OutOfRange);
    }

    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    Ok(Measurement {
        humidity,
        temperature,
    })
}

/// Bit-banged DHT22 driver over an open-drain pin.
pub struct Dht22<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// `pin` must be configured open-drain with a pull-up and input enabled.
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    pub fn read(&mut self) -> Result<Measurement, SensorError> {
        let frame = self.read_frame()?;
        decode_frame(&frame)
    }

    /// Run the start handshake and sample the 40 data bits.
    pub fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SensorError> {
        self.pin.set_low().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(RELEASE_US);

        // Sensor response: pulls low, then high, then starts the first bit.
        self.pulse_len(true)?;
        self.pulse_len(false)?;
        self.pulse_len(true)?;

        let mut frame = [0u8; FRAME_LEN];
        for byte in frame.iter_mut() {
            for _ in 0..8 {
                let low = self.pulse_len(false)?;
                let high = self.pulse_len(true)?;
                *byte = (*byte << 1) | u8::from(high > low);
            }
        }
        Ok(frame)
    }

    /// Number of polls until the line leaves `high`.
    fn pulse_len(&mut self, high: bool) -> Result<u32, SensorError> {
        let mut polls = 0;
        while self.pin.is_high().map_err(|_| SensorError::Gpio)? == high {
            polls += 1;
            if polls > MAX_POLLS {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
        }
        Ok(polls)
    }
}

impl<P, D> HumiditySensor for Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.read().map(|m| m.humidity)
    }
}
