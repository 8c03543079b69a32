use std::sync::Arc;

use axum::Router;
use hydrosense_api::{AggregateRecord, Reading, epoch};
use time::OffsetDateTime;

use hydrosense_server::app::create_router;
use hydrosense_server::configs::{Database, SchemaManager, Storage, Telemetry};
use hydrosense_server::repositories::{AggregateRepository, AggregateStore, ReadingRepository, ReadingStore};
use hydrosense_server::services::{Aggregator, QueryService};

pub const DEVICE_ID: &str = "arduino_001";
pub const GATEWAY_ID: &str = "gateway_001";

pub struct MockApp {
    pub router: Router,
    pub readings: Arc<ReadingRepository>,
    pub aggregates: Arc<AggregateRepository>,
}

impl MockApp {
    pub async fn new() -> Self {
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

        let telemetry = Telemetry {
            device_id: DEVICE_ID.to_string(),
            interval_label: "5min".to_string(),
            interval_secs: 300,
            window_limit: 10_000,
            store_timeout_ms: 5_000,
        };

        let readings = Arc::new(ReadingRepository::new(storage.clone()));
        let aggregates = Arc::new(AggregateRepository::new(storage.clone()));

        let aggregator = Arc::new(Aggregator::new(
            readings.clone(),
            aggregates.clone(),
            telemetry.clone(),
        ));
        let query_service = Arc::new(QueryService::new(
            readings.clone(),
            aggregates.clone(),
            telemetry,
        ));

        Self {
            router: create_router(query_service, aggregator),
            readings,
            aggregates,
        }
    }

    pub async fn create_test_reading(&self, temperature: f64, ph: f64, timestamp: OffsetDateTime) -> Reading {
        let reading = Reading {
            device_id: DEVICE_ID.to_string(),
            temperature,
            ph,
            gateway_id: GATEWAY_ID.to_string(),
            timestamp: epoch::truncate(timestamp),
        };

        self.readings.append(&reading).await.unwrap();

        reading
    }

    pub async fn create_test_aggregate(&self, window_end: OffsetDateTime, avg_temperature: f64) -> AggregateRecord {
        let record = AggregateRecord {
            interval_label: "5min".to_string(),
            window_end: epoch::truncate(window_end),
            device_id: DEVICE_ID.to_string(),
            gateway_id: GATEWAY_ID.to_string(),
            avg_temperature,
            min_temperature: avg_temperature - 1.0,
            max_temperature: avg_temperature + 1.0,
            avg_ph: 7.0,
            min_ph: 6.9,
            max_ph: 7.1,
            sample_count: 3,
        };

        self.aggregates.upsert(&record).await.unwrap();

        record
    }
}
