use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use hydrosense_api::restful::{FailureResponse, SensorQuery};
use time::OffsetDateTime;

use crate::errors::{ApiError, QueryError};
use crate::services::{QueryService, Series};

#[derive(Clone)]
pub struct SensorState {
    pub query_service: Arc<QueryService>,
}

pub fn sensor_router(sensor_state: SensorState) -> Router {
    Router::new()
        .route("/sensors", get(get_sensor_data))
        .with_state(sensor_state)
}

#[utoipa::path(
    get,
    path = "/sensors",
    tag = "sensor",
    params(SensorQuery),
    responses(
        (status = 200, description = "Raw readings newest first, or aggregate records oldest first"),
        (status = 400, description = "Unsupported type or range", body = FailureResponse),
        (status = 500, description = "Store failure", body = FailureResponse),
        (status = 504, description = "Store timeout", body = FailureResponse)
    )
)]
pub async fn get_sensor_data(
    State(state): State<SensorState>,
    query: Result<Query<SensorQuery>, QueryRejection>,
) -> Result<Json<Series>, ApiError> {
    let Query(query) = query.map_err(|e| QueryError::InvalidRequest(e.body_text()))?;

    // Resolved before any store access
    let mode = query.mode().map_err(QueryError::from)?;

    let series = state
        .query_service
        .serve(mode, OffsetDateTime::now_utc())
        .await?;

    tracing::debug!("serving {} items for {:?}", series.len(), mode);

    Ok(Json(series))
}
