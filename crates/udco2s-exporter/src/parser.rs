//! Parser for UD-CO2S response lines (`CO2=512,HUM=45.3,TMP=21.7`).

use crate::error::ParseError;
use crate::sample::SensorSample;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SENSOR_LINE: Regex =
        Regex::new(r"CO2=(\d+),HUM=(\d+\.\d+),TMP=(\d+\.\d+)").expect("sensor line pattern");
}

/// Values from one line, all converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub co2_ppm: u32,
    pub humidity_pct: f64,
    pub temperature_c: f64,
}

impl Reading {
    /// Stamp the reading with the time it was accepted.
    pub fn into_sample(self, epoch: i64) -> SensorSample {
        SensorSample {
            co2_ppm: self.co2_ppm,
            humidity_pct: self.humidity_pct,
            temperature_c: self.temperature_c,
            last_success_epoch: epoch,
        }
    }
}

/// Parse one line. Every field is converted before anything is returned, so
/// a caller that only stores `Ok` values never stores half a line.
pub fn parse_line(line: &str) -> Result<Reading, ParseError> {
    let caps = SENSOR_LINE
        .captures(line)
        .ok_or_else(|| ParseError::NoMatch(line.trim_end().to_string()))?;

    Ok(Reading {
        co2_ppm: field(&caps[1], "CO2")?,
        humidity_pct: field(&caps[2], "HUM")?,
        temperature_c: field(&caps[3], "TMP")?,
    })
}

fn field<T: std::str::FromStr>(raw: &str, name: &'static str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidField {
        field: name,
        value: raw.to_string(),
    })
}
