//! Device telegram decoding.
//!
//! The field device prints one line per measurement, e.g. `T:24.13,pH:2.27`.
//! Fields are positional: temperature first, pH second.

use std::str::FromStr;

use time::OffsetDateTime;

use crate::models::{DeviceIdentity, Reading, ReadingError};

const TEMPERATURE_KEY: &str = "T";
const PH_KEY: &str = "pH";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("empty telegram")]
    Empty,

    #[error("expected 2 fields, found {0}")]
    FieldCount(usize),

    #[error("field `{0}` has no `:` separator")]
    MissingSeparator(String),

    #[error("expected key `{expected}`, found `{found}`")]
    UnexpectedKey { expected: &'static str, found: String },

    #[error("value `{value}` of `{key}` is not a number")]
    InvalidNumber { key: &'static str, value: String },

    #[error("value of `{0}` is not finite")]
    NonFinite(&'static str),
}

impl From<ReadingError> for ParseError {
    fn from(error: ReadingError) -> Self {
        match error {
            ReadingError::NonFiniteTemperature => ParseError::NonFinite(TEMPERATURE_KEY),
            ReadingError::NonFinitePh => ParseError::NonFinite(PH_KEY),
        }
    }
}

/// Decoded telegram values, not yet attributed to a device or a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telegram {
    pub temperature: f64,
    pub ph: f64,
}

impl Telegram {
    pub fn into_reading(
        self,
        identity: &DeviceIdentity,
        received_at: OffsetDateTime,
    ) -> Result<Reading, ParseError> {
        Ok(Reading::new(identity, self.temperature, self.ph, received_at)?)
    }
}

impl FromStr for Telegram {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(ParseError::FieldCount(fields.len()));
        }

        Ok(Telegram {
            temperature: parse_field(fields[0], TEMPERATURE_KEY)?,
            ph: parse_field(fields[1], PH_KEY)?,
        })
    }
}

fn parse_field(field: &str, expected: &'static str) -> Result<f64, ParseError> {
    let (key, value) = field
        .split_once(':')
        .ok_or_else(|| ParseError::MissingSeparator(field.to_string()))?;

    if key.trim() != expected {
        return Err(ParseError::UnexpectedKey {
            expected,
            found: key.trim().to_string(),
        });
    }

    let value = value.trim();
    let number = value.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        key: expected,
        value: value.to_string(),
    })?;

    if !number.is_finite() {
        return Err(ParseError::NonFinite(expected));
    }

    Ok(number)
}
