use super::{AggregateError, QueryError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Query error: {0}")]
    QueryError(#[from] QueryError),

    #[error("Aggregate error: {0}")]
    AggregateError(#[from] AggregateError),
}
