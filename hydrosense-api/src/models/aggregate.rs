use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Identity of an aggregate record. At most one record exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateKey {
    pub interval_label: String,
    pub window_end: OffsetDateTime,
    pub device_id: String,
}

/// Statistics summarizing every reading of one device within one window.
///
/// Field names on the wire follow the display client: `interval` and
/// `timestamp` carry the interval label and the window end.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    /// Interval label, e.g. `5min`
    #[serde(rename = "interval")]
    pub interval_label: String,
    /// Right-closed end of the aggregated window
    #[serde(rename = "timestamp", with = "time::serde::rfc3339")]
    pub window_end: OffsetDateTime,
    pub device_id: String,
    /// Gateway of the most recent reading in the window
    pub gateway_id: String,
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_ph: f64,
    pub min_ph: f64,
    pub max_ph: f64,
    /// Number of readings in the window, never zero
    pub sample_count: u32,
}

impl AggregateRecord {
    pub fn key(&self) -> AggregateKey {
        AggregateKey {
            interval_label: self.interval_label.clone(),
            window_end: self.window_end,
            device_id: self.device_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_wire_names_match_display_client() {
        let record = AggregateRecord {
            interval_label: "5min".to_string(),
            window_end: datetime!(2024-05-01 08:05:00 UTC),
            device_id: "arduino_001".to_string(),
            gateway_id: "gateway_001".to_string(),
            avg_temperature: 22.0,
            min_temperature: 20.0,
            max_temperature: 24.0,
            avg_ph: 7.05,
            min_ph: 7.0,
            max_ph: 7.1,
            sample_count: 3,
        };

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["interval"], json!("5min"));
        assert_eq!(value["timestamp"], json!("2024-05-01T08:05:00Z"));
        assert_eq!(value["avg_ph"], json!(7.05));
        assert_eq!(value["sample_count"], json!(3));
        assert!(value.get("interval_label").is_none());
    }

    #[test]
    fn test_key_identity() {
        let record = AggregateRecord {
            interval_label: "5min".to_string(),
            window_end: datetime!(2024-05-01 08:05:00 UTC),
            device_id: "arduino_001".to_string(),
            gateway_id: "gateway_002".to_string(),
            avg_temperature: 0.0,
            min_temperature: 0.0,
            max_temperature: 0.0,
            avg_ph: 0.0,
            min_ph: 0.0,
            max_ph: 0.0,
            sample_count: 1,
        };

        assert_eq!(
            record.key(),
            AggregateKey {
                interval_label: "5min".to_string(),
                window_end: datetime!(2024-05-01 08:05:00 UTC),
                device_id: "arduino_001".to_string(),
            }
        );
    }
}
