use std::sync::Arc;

use hydrosense_api::{AggregateRecord, QueryMode, Reading, TimeRange, epoch};
use serde::Serialize;
use time::OffsetDateTime;

use super::with_timeout;
use crate::configs::Telemetry;
use crate::errors::QueryError;
use crate::repositories::{AggregateStore, ReadingQuery, ReadingStore};

/// Hard cap on a raw query.
pub const RAW_LIMIT: u32 = 100;

/// Response of a query. Serialized as a bare JSON array either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    Raw(Vec<Reading>),
    Aggregated(Vec<AggregateRecord>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Series::Raw(readings) => readings.len(),
            Series::Aggregated(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct QueryService {
    readings: Arc<dyn ReadingStore>,
    aggregates: Arc<dyn AggregateStore>,
    telemetry: Telemetry,
}

impl QueryService {
    pub fn new(
        readings: Arc<dyn ReadingStore>,
        aggregates: Arc<dyn AggregateStore>,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            readings,
            aggregates,
            telemetry,
        }
    }

    pub async fn serve(&self, mode: QueryMode, now: OffsetDateTime) -> Result<Series, QueryError> {
        match mode {
            QueryMode::Raw => self.raw().await.map(Series::Raw),
            QueryMode::Aggregated(range) => self.aggregated(range, now).await.map(Series::Aggregated),
        }
    }

    async fn raw(&self) -> Result<Vec<Reading>, QueryError> {
        let query = ReadingQuery::latest(&self.telemetry.device_id, RAW_LIMIT);

        Ok(with_timeout(self.telemetry.store_timeout(), self.readings.query(&query)).await?)
    }

    async fn aggregated(
        &self,
        range: TimeRange,
        now: OffsetDateTime,
    ) -> Result<Vec<AggregateRecord>, QueryError> {
        let threshold = epoch::truncate(now) - range.lookback();
        tracing::debug!("aggregates of the last {} since {}", range, threshold);

        let records = with_timeout(
            self.telemetry.store_timeout(),
            self.aggregates
                .query_since(&self.telemetry.interval_label, threshold),
        )
        .await?;

        // One partition per deployment, other devices are not served
        Ok(records
            .into_iter()
            .filter(|record| record.device_id == self.telemetry.device_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use time::Duration;
    use time::macros::datetime;

    use super::*;
    use crate::configs::{Database, SchemaManager, Storage};
    use crate::errors::StoreError;
    use crate::repositories::{AggregateRepository, ReadingRepository};

    struct SlowStore;

    #[async_trait]
    impl ReadingStore for SlowStore {
        async fn append(&self, _: &Reading) -> Result<(), StoreError> {
            Ok(())
        }

        async fn query(&self, _: &ReadingQuery) -> Result<Vec<Reading>, StoreError> {
            tokio::time::sleep(StdDuration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    fn telemetry() -> Telemetry {
        Telemetry {
            device_id: "arduino_001".to_string(),
            interval_label: "5min".to_string(),
            interval_secs: 300,
            window_limit: 10_000,
            store_timeout_ms: 50,
        }
    }

    async fn setup_stores() -> (Arc<ReadingRepository>, Arc<AggregateRepository>) {
        let storage = Arc::new(
            Storage::new(
                Database {
                    migration_path: None,
                    clean_start: true,
                    url: String::from("sqlite::memory:"),
                },
                SchemaManager::default(),
            )
            .await
            .unwrap(),
        );

        (
            Arc::new(ReadingRepository::new(storage.clone())),
            Arc::new(AggregateRepository::new(storage)),
        )
    }

    fn record(window_end: OffsetDateTime) -> AggregateRecord {
        AggregateRecord {
            interval_label: "5min".to_string(),
            window_end,
            device_id: "arduino_001".to_string(),
            gateway_id: "gateway_001".to_string(),
            avg_temperature: 22.0,
            min_temperature: 20.0,
            max_temperature: 24.0,
            avg_ph: 7.0,
            min_ph: 7.0,
            max_ph: 7.0,
            sample_count: 3,
        }
    }

    #[tokio::test]
    async fn test_raw_is_capped_and_newest_first() {
        let (readings, aggregates) = setup_stores().await;
        let base_time = datetime!(2024-05-01 00:00:00 UTC);

        for second in 0..120 {
            readings
                .append(&Reading {
                    device_id: "arduino_001".to_string(),
                    temperature: second as f64,
                    ph: 7.0,
                    gateway_id: "gateway_001".to_string(),
                    timestamp: base_time + Duration::seconds(second),
                })
                .await
                .unwrap();
        }

        let service = QueryService::new(readings, aggregates, telemetry());
        let Series::Raw(series) = service.serve(QueryMode::Raw, base_time).await.unwrap() else {
            panic!("expected a raw series");
        };

        assert_eq!(series.len(), RAW_LIMIT as usize);
        assert_eq!(series[0].temperature, 119.0);
        assert!(series.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_aggregated_respects_lookback() {
        let (readings, aggregates) = setup_stores().await;
        let now = datetime!(2024-05-31 12:00:00 UTC);

        let inside = record(now - Duration::hours(23));
        let boundary = record(now - Duration::hours(24));
        let week_old = record(now - Duration::days(6));
        for stored in [&inside, &boundary, &week_old] {
            aggregates.upsert(stored).await.unwrap();
        }

        let service = QueryService::new(readings, aggregates, telemetry());

        let day = service
            .serve(QueryMode::Aggregated(TimeRange::Day), now)
            .await
            .unwrap();
        assert_eq!(day, Series::Aggregated(vec![inside.clone()]));

        let week = service
            .serve(QueryMode::Aggregated(TimeRange::Week), now)
            .await
            .unwrap();
        assert_eq!(week, Series::Aggregated(vec![week_old, boundary, inside]));
    }

    #[tokio::test]
    async fn test_store_timeout_reported() {
        let (_, aggregates) = setup_stores().await;
        let service = QueryService::new(Arc::new(SlowStore), aggregates, telemetry());

        let error = service
            .serve(QueryMode::Raw, datetime!(2024-05-01 00:00:00 UTC))
            .await
            .unwrap_err();

        assert!(matches!(error, QueryError::Store(StoreError::Timeout(_))));
        assert_eq!(error.status_code(), axum::http::StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_series_serializes_as_bare_array() {
        let json = serde_json::to_value(Series::Raw(Vec::new())).unwrap();

        assert_eq!(json, serde_json::json!([]));
    }
}
