use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::http::{StatusCode, Uri};
use axum::{Json, Router, middleware};
use hydrosense_api::restful::{FailureResponse, ResponseStatus};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::docs::docs_router;
use crate::handles::*;
use crate::middlewares::status_header;
use crate::repositories::{AggregateRepository, ReadingRepository};
use crate::services::{Aggregator, IngestService, QueryService, spawn_scheduler};

pub fn create_router(query_service: Arc<QueryService>, aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .merge(sensor_router(SensorState { query_service }))
        .merge(aggregate_router(AggregateState { aggregator }))
        .merge(health_router())
        .merge(docs_router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Outermost, so preflight answers are classified too
        .layer(middleware::from_fn(status_header))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<FailureResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(FailureResponse {
            status: ResponseStatus::Failure,
            message: format!("No route for {}", uri.path()),
        }),
    )
}

pub async fn create_app(settings: &Arc<Settings>) -> anyhow::Result<Router> {
    let storage = Arc::new(Storage::new(settings.database.clone(), SchemaManager::default()).await?);

    let reading_repository = Arc::new(ReadingRepository::new(storage.clone()));
    let aggregate_repository = Arc::new(AggregateRepository::new(storage.clone()));

    let aggregator = Arc::new(Aggregator::new(
        reading_repository.clone(),
        aggregate_repository.clone(),
        settings.telemetry.clone(),
    ));
    let query_service = Arc::new(QueryService::new(
        reading_repository.clone(),
        aggregate_repository.clone(),
        settings.telemetry.clone(),
    ));

    if settings.broker.enabled {
        let ingest_service = IngestService::new(
            &settings.broker,
            reading_repository.clone(),
            settings.telemetry.store_timeout(),
        )
        .map_err(|e| anyhow!(e))?;
        ingest_service.spawn();

        tracing::info!(
            "ingesting from {}:{} on {}",
            settings.broker.host,
            settings.broker.port,
            settings.broker.topic
        );
    }

    if settings.aggregator.schedule_secs > 0 {
        spawn_scheduler(
            aggregator.clone(),
            Duration::from_secs(settings.aggregator.schedule_secs),
        );

        tracing::info!(
            "aggregating every {}s",
            settings.aggregator.schedule_secs
        );
    }

    Ok(create_router(query_service, aggregator))
}
