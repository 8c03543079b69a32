pub mod aggregate;
pub mod api;
pub mod ingest;
pub mod query;
pub mod store;

pub use aggregate::AggregateError;
pub use api::ApiError;
pub use ingest::IngestError;
pub use query::QueryError;
pub use store::StoreError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hydrosense_api::restful::{FailureResponse, ResponseStatus};
use uuid::Uuid;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::QueryError(e) => e.status_code(),
            ApiError::AggregateError(e) => e.status_code(),
        };

        // Client mistakes are echoed, store failures are logged under an id
        let message = if status.is_client_error() {
            self.to_string()
        } else {
            let error_id = Uuid::new_v4();
            tracing::error!(error_id = ?error_id, "{}", self);
            format!("{} (error id {error_id})", status_message(status))
        };

        let body = Json(FailureResponse {
            status: ResponseStatus::Failure,
            message,
        });

        (status, body).into_response()
    }
}

fn status_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::GATEWAY_TIMEOUT => "Store timeout",
        _ => "Internal server error",
    }
}
