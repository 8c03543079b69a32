use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use hydrosense_api::restful::{AggregateResponse, FailureResponse, ResponseStatus};
use time::OffsetDateTime;

use crate::errors::ApiError;
use crate::services::{AggregateOutcome, Aggregator};

#[derive(Clone)]
pub struct AggregateState {
    pub aggregator: Arc<Aggregator>,
}

pub fn aggregate_router(aggregate_state: AggregateState) -> Router {
    Router::new()
        .route("/aggregate", post(trigger_aggregation))
        .with_state(aggregate_state)
}

/// Aggregates the window ending now.
#[utoipa::path(
    post,
    path = "/aggregate",
    tag = "aggregate",
    responses(
        (status = 200, description = "Window aggregated, or nothing to aggregate", body = AggregateResponse),
        (status = 500, description = "Store failure", body = FailureResponse),
        (status = 504, description = "Store timeout", body = FailureResponse)
    )
)]
pub async fn trigger_aggregation(
    State(state): State<AggregateState>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let response = match state.aggregator.run(OffsetDateTime::now_utc()).await? {
        AggregateOutcome::Written(record) => AggregateResponse {
            status: ResponseStatus::Success,
            message: format!("Saved {} aggregate", record.interval_label),
            data: Some(record),
        },
        AggregateOutcome::NoData => AggregateResponse {
            status: ResponseStatus::Success,
            message: "No data in time range".to_string(),
            data: None,
        },
    };

    Ok(Json(response))
}
