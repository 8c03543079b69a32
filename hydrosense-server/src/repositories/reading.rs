use std::sync::Arc;

use async_trait::async_trait;
use hydrosense_api::{Reading, epoch};
use sqlx::{QueryBuilder, Sqlite};

use super::{ReadingQuery, ReadingStore};
use crate::configs::Storage;
use crate::errors::StoreError;
use crate::models::ReadingRow;

#[derive(Clone)]
pub struct ReadingRepository {
    storage: Arc<Storage>,
}

impl ReadingRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ReadingStore for ReadingRepository {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let row = ReadingRow::from(reading);

        sqlx::query(
            r#"
            INSERT INTO readings (device_id, gateway_id, temperature, ph, time_ms)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&row.device_id)
        .bind(&row.gateway_id)
        .bind(row.temperature)
        .bind(row.ph)
        .bind(row.time_ms)
        .execute(self.storage.get_pool())
        .await?;

        Ok(())
    }

    async fn query(&self, query: &ReadingQuery) -> Result<Vec<Reading>, StoreError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT device_id, gateway_id, temperature, ph, time_ms FROM readings WHERE device_id = ",
        );
        builder.push_bind(query.device_id.clone());

        if let Some(after) = query.after {
            builder.push(" AND time_ms > ").push_bind(epoch::to_millis(after));
        }
        if let Some(until) = query.until {
            builder.push(" AND time_ms <= ").push_bind(epoch::to_millis(until));
        }

        let order = query.order.as_sql();
        builder
            .push(format!(" ORDER BY time_ms {order}, id {order} LIMIT "))
            .push_bind(i64::from(query.limit));

        let rows = builder
            .build_query_as::<ReadingRow>()
            .fetch_all(self.storage.get_pool())
            .await?;

        rows.into_iter()
            .map(|row| Reading::try_from(row).map_err(|e| StoreError::Corrupt(e.to_string())))
            .collect()
    }
}
