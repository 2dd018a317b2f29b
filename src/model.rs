// Model of the data read and reported in one control cycle

use core::fmt::{self, Write};
use core::str::FromStr;

use crate::config::STATUS_LINE_CAPACITY;
use crate::error::ParseError;

/// Sensor values acquired at the start of a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub phosphorus_present: bool,
    pub potassium_present: bool,
    /// Raw ADC value of the light sensor, reported as `pH`
    pub light_reading: u16,
    /// Relative humidity in percent; NaN when the sensor read failed
    pub humidity: f32,
}

impl Reading {
    pub fn humidity_valid(&self) -> bool {
        !self.humidity.is_nan()
    }
}

/// A reading together with the irrigation decision taken for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub reading: Reading,
    pub irrigate: bool,
}

impl CycleReport {
    /// Format as `Fosforo:<0|1>,Potassio:<0|1>,pH:<int>,Umidade:<float>,Irrigacao:<0|1>`
    /// without the trailing newline.
    pub fn status_line(&self) -> heapless::String<STATUS_LINE_CAPACITY> {
        let mut buffer = heapless::String::new();
        let _ = write!(buffer, "{}", self);
        buffer
    }
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.reading;
        write!(
            f,
            "Fosforo:{},Potassio:{},pH:{},",
            flag(r.phosphorus_present),
            flag(r.potassium_present),
            r.light_reading
        )?;
        if r.humidity_valid() {
            write!(f, "Umidade:{:.2}", r.humidity)?;
        } else {
            f.write_str("Umidade:nan")?;
        }
        write!(f, ",Irrigacao:{}", flag(self.irrigate))
    }
}

const FIELD_KEYS: [&str; 5] = ["Fosforo", "Potassio", "pH", "Umidade", "Irrigacao"];

fn parse_flag(value: &str, key: &'static str) -> Result<bool, ParseError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ParseError::InvalidFlag(key)),
    }
}

impl FromStr for CycleReport {
    type Err = ParseError;

    /// Decode one status line as printed on the serial console.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.trim_end_matches(['\r', '\n']).split(',');
        let mut values = [""; 5];

        for (slot, key) in values.iter_mut().zip(FIELD_KEYS) {
            let field = fields.next().ok_or(ParseError::UnexpectedField(key))?;
            *slot = field
                .strip_prefix(key)
                .and_then(|rest| rest.strip_prefix(':'))
                .ok_or(ParseError::UnexpectedField(key))?;
        }
        if fields.next().is_some() {
            return Err(ParseError::TrailingData);
        }

        let [phosphorus, potassium, light, humidity, irrigate] = values;
        let humidity = if humidity == "nan" {
            f32::NAN
        } else {
            humidity
                .parse()
                .map_err(|_| ParseError::InvalidNumber("Umidade"))?
        };

        Ok(Self {
            reading: Reading {
                phosphorus_present: parse_flag(phosphorus, "Fosforo")?,
                potassium_present: parse_flag(potassium, "Potassio")?,
                light_reading: light.parse().map_err(|_| ParseError::InvalidNumber("pH"))?,
                humidity,
            },
            irrigate: parse_flag(irrigate, "Irrigacao")?,
        })
    }
}
