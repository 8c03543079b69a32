use std::sync::Arc;

use async_trait::async_trait;
use hydrosense_api::{AggregateKey, AggregateRecord, epoch};
use time::OffsetDateTime;

use super::AggregateStore;
use crate::configs::Storage;
use crate::errors::StoreError;
use crate::models::AggregateRow;

#[derive(Clone)]
pub struct AggregateRepository {
    storage: Arc<Storage>,
}

impl AggregateRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

fn into_record(row: AggregateRow) -> Result<AggregateRecord, StoreError> {
    AggregateRecord::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl AggregateStore for AggregateRepository {
    async fn upsert(&self, record: &AggregateRecord) -> Result<(), StoreError> {
        let row = AggregateRow::from(record);

        sqlx::query(
            r#"
            INSERT INTO aggregates (
                interval_label, window_end_ms, device_id, gateway_id,
                avg_temperature, min_temperature, max_temperature,
                avg_ph, min_ph, max_ph, sample_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (interval_label, window_end_ms, device_id) DO UPDATE SET
                gateway_id = excluded.gateway_id,
                avg_temperature = excluded.avg_temperature,
                min_temperature = excluded.min_temperature,
                max_temperature = excluded.max_temperature,
                avg_ph = excluded.avg_ph,
                min_ph = excluded.min_ph,
                max_ph = excluded.max_ph,
                sample_count = excluded.sample_count
            "#,
        )
        .bind(&row.interval_label)
        .bind(row.window_end_ms)
        .bind(&row.device_id)
        .bind(&row.gateway_id)
        .bind(row.avg_temperature)
        .bind(row.min_temperature)
        .bind(row.max_temperature)
        .bind(row.avg_ph)
        .bind(row.min_ph)
        .bind(row.max_ph)
        .bind(row.sample_count)
        .execute(self.storage.get_pool())
        .await?;

        Ok(())
    }

    async fn query_since(
        &self,
        interval_label: &str,
        threshold: OffsetDateTime,
    ) -> Result<Vec<AggregateRecord>, StoreError> {
        let rows: Vec<AggregateRow> = sqlx::query_as(
            r#"
            SELECT * FROM aggregates
            WHERE interval_label = $1 AND window_end_ms > $2
            ORDER BY window_end_ms ASC, device_id ASC
            "#,
        )
        .bind(interval_label)
        .bind(epoch::to_millis(threshold))
        .fetch_all(self.storage.get_pool())
        .await?;

        rows.into_iter().map(into_record).collect()
    }

    async fn find(&self, key: &AggregateKey) -> Result<Option<AggregateRecord>, StoreError> {
        let row: Option<AggregateRow> = sqlx::query_as(
            r#"
            SELECT * FROM aggregates
            WHERE interval_label = $1 AND window_end_ms = $2 AND device_id = $3
            "#,
        )
        .bind(&key.interval_label)
        .bind(epoch::to_millis(key.window_end))
        .bind(&key.device_id)
        .fetch_optional(self.storage.get_pool())
        .await?;

        row.map(into_record).transpose()
    }
}
