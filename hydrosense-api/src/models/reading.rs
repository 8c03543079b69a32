use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::epoch;

/// Statically configured identity stamped onto every reading a gateway
/// forwards. The field device has neither an identity nor a clock of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub gateway_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    #[error("temperature is not a finite number")]
    NonFiniteTemperature,

    #[error("pH is not a finite number")]
    NonFinitePh,
}

/// One canonical measurement event.
///
/// This is also the JSON envelope published on the ingestion channel.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Partition key of the reading store
    pub device_id: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Acidity on the pH scale
    #[serde(rename = "pH")]
    pub ph: f64,
    /// Gateway that received the telegram
    pub gateway_id: String,
    /// Receipt time stamped by the gateway
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Reading {
    pub fn new(
        identity: &DeviceIdentity,
        temperature: f64,
        ph: f64,
        received_at: OffsetDateTime,
    ) -> Result<Self, ReadingError> {
        let reading = Self {
            device_id: identity.device_id.clone(),
            temperature,
            ph,
            gateway_id: identity.gateway_id.clone(),
            timestamp: epoch::truncate(received_at),
        };

        reading.validate()?;

        Ok(reading)
    }

    /// Checks the numeric invariant. Readings decoded from the wire go
    /// through this before they are stored.
    pub fn validate(&self) -> Result<(), ReadingError> {
        if !self.temperature.is_finite() {
            return Err(ReadingError::NonFiniteTemperature);
        }
        if !self.ph.is_finite() {
            return Err(ReadingError::NonFinitePh);
        }

        Ok(())
    }
}
