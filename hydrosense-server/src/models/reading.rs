use hydrosense_api::{Reading, epoch};

use super::Table;

/// Stored form of a reading. Time is kept as epoch milliseconds so range
/// predicates compare integers.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ReadingRow {
    pub device_id: String,
    pub gateway_id: String,
    /// Temperature in Celsius
    pub temperature: f64,
    pub ph: f64,
    pub time_ms: i64,
}

impl From<&Reading> for ReadingRow {
    fn from(reading: &Reading) -> Self {
        Self {
            device_id: reading.device_id.clone(),
            gateway_id: reading.gateway_id.clone(),
            temperature: reading.temperature,
            ph: reading.ph,
            time_ms: epoch::to_millis(reading.timestamp),
        }
    }
}

impl TryFrom<ReadingRow> for Reading {
    type Error = time::error::ComponentRange;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        Ok(Reading {
            device_id: row.device_id,
            temperature: row.temperature,
            ph: row.ph,
            gateway_id: row.gateway_id,
            timestamp: epoch::from_millis(row.time_ms)?,
        })
    }
}

#[derive(Clone)]
pub struct ReadingTable;

impl Table for ReadingTable {
    fn name(&self) -> &'static str {
        "readings"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id TEXT NOT NULL,
                gateway_id TEXT NOT NULL,
                temperature REAL NOT NULL,
                ph REAL NOT NULL,
                time_ms INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS readings_device_time ON readings (device_id, time_ms);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS readings;")
    }
}
