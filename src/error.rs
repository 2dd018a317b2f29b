//! Error types shared by the sensor and actuator seams.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer, or a line stayed at one level too long.
    Timeout,
    /// A DHT22 frame failed its checksum.
    Checksum,
    /// The decoded value is outside the sensor's physical range.
    OutOfRange,
    /// A GPIO level could not be sampled.
    Gpio,
    /// The ADC conversion did not complete.
    Adc,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "sensor timeout"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::Gpio => write!(f, "GPIO read failed"),
            Self::Adc => write!(f, "ADC read failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The output pin could not be driven.
    Gpio,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio => write!(f, "GPIO write failed"),
        }
    }
}

/// Why a status line could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A field is missing, out of order, or carries an unexpected key.
    UnexpectedField(&'static str),
    /// A flag field is neither `0` nor `1`.
    InvalidFlag(&'static str),
    /// A numeric field does not parse.
    InvalidNumber(&'static str),
    /// Extra fields follow `Irrigacao`.
    TrailingData,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedField(key) => write!(f, "expected field `{key}`"),
            Self::InvalidFlag(key) => write!(f, "`{key}` must be 0 or 1"),
            Self::InvalidNumber(key) => write!(f, "`{key}` is not a number"),
            Self::TrailingData => write!(f, "trailing data after last field"),
        }
    }
}
