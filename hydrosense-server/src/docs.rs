use axum::Router;
use axum::routing::get;
use axum::Json;
use hydrosense_api::restful::{AggregateResponse, FailureResponse, ResponseStatus};
use hydrosense_api::{AggregateRecord, Reading, TimeRange};
use utoipa::OpenApi;

use crate::handles;

#[derive(OpenApi)]
#[openapi(
    paths(
        handles::get_sensor_data,
        handles::trigger_aggregation,
        handles::health,
    ),
    components(schemas(
        Reading,
        AggregateRecord,
        AggregateResponse,
        FailureResponse,
        ResponseStatus,
        TimeRange,
    )),
    tags(
        (name = "sensor", description = "Raw and aggregated sensor series"),
        (name = "aggregate", description = "Aggregation trigger"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
