mod aggregator_service;
mod ingest_service;
mod query_service;
mod scheduler_service;

pub use aggregator_service::*;
pub use ingest_service::*;
pub use query_service::*;
pub use scheduler_service::*;

use std::future::Future;
use std::time::Duration;

use crate::errors::StoreError;

/// Bounds a store operation. An elapsed deadline is reported as a store
/// failure and is not retried.
pub(crate) async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}
