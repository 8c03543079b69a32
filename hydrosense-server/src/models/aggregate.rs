use hydrosense_api::{AggregateRecord, epoch};

use super::Table;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AggregateRow {
    pub interval_label: String,
    pub window_end_ms: i64,
    pub device_id: String,
    pub gateway_id: String,
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_ph: f64,
    pub min_ph: f64,
    pub max_ph: f64,
    pub sample_count: i64,
}

impl From<&AggregateRecord> for AggregateRow {
    fn from(record: &AggregateRecord) -> Self {
        Self {
            interval_label: record.interval_label.clone(),
            window_end_ms: epoch::to_millis(record.window_end),
            device_id: record.device_id.clone(),
            gateway_id: record.gateway_id.clone(),
            avg_temperature: record.avg_temperature,
            min_temperature: record.min_temperature,
            max_temperature: record.max_temperature,
            avg_ph: record.avg_ph,
            min_ph: record.min_ph,
            max_ph: record.max_ph,
            sample_count: record.sample_count as i64,
        }
    }
}

impl TryFrom<AggregateRow> for AggregateRecord {
    type Error = String;

    fn try_from(row: AggregateRow) -> Result<Self, Self::Error> {
        let window_end = epoch::from_millis(row.window_end_ms).map_err(|e| e.to_string())?;
        let sample_count = u32::try_from(row.sample_count)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| format!("invalid sample count {}", row.sample_count))?;

        Ok(AggregateRecord {
            interval_label: row.interval_label,
            window_end,
            device_id: row.device_id,
            gateway_id: row.gateway_id,
            avg_temperature: row.avg_temperature,
            min_temperature: row.min_temperature,
            max_temperature: row.max_temperature,
            avg_ph: row.avg_ph,
            min_ph: row.min_ph,
            max_ph: row.max_ph,
            sample_count,
        })
    }
}

#[derive(Clone)]
pub struct AggregateTable;

impl Table for AggregateTable {
    fn name(&self) -> &'static str {
        "aggregates"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS aggregates (
                interval_label TEXT NOT NULL,
                window_end_ms INTEGER NOT NULL,
                device_id TEXT NOT NULL,
                gateway_id TEXT NOT NULL,
                avg_temperature REAL NOT NULL,
                min_temperature REAL NOT NULL,
                max_temperature REAL NOT NULL,
                avg_ph REAL NOT NULL,
                min_ph REAL NOT NULL,
                max_ph REAL NOT NULL,
                sample_count INTEGER NOT NULL CHECK (sample_count > 0),
                PRIMARY KEY (interval_label, window_end_ms, device_id)
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS aggregates;")
    }
}
