use axum::http::StatusCode;
use hydrosense_api::QueryModeError;

use super::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Unsupported range: {0}")]
    UnsupportedRange(String),

    #[error("Query failed: {0}")]
    Store(#[from] StoreError),
}

impl From<QueryModeError> for QueryError {
    fn from(error: QueryModeError) -> Self {
        match error {
            QueryModeError::UnsupportedType(value) => QueryError::UnsupportedType(value),
            QueryModeError::UnsupportedRange(value) => QueryError::UnsupportedRange(value),
        }
    }
}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            QueryError::UnsupportedType(_) => StatusCode::BAD_REQUEST,
            QueryError::UnsupportedRange(_) => StatusCode::BAD_REQUEST,
            QueryError::Store(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            QueryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
