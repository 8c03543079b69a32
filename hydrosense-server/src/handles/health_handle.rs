use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
