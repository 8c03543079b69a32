use axum::http::StatusCode;

use super::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("Reading query failed: {0}")]
    Query(#[source] StoreError),

    #[error("Aggregate write failed: {0}")]
    Write(#[source] StoreError),
}

impl AggregateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AggregateError::Query(e) | AggregateError::Write(e) if e.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            AggregateError::Query(_) | AggregateError::Write(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
