mod aggregate;
mod reading;

pub use aggregate::AggregateRepository;
pub use reading::ReadingRepository;

use async_trait::async_trait;
use hydrosense_api::{AggregateKey, AggregateRecord, Reading};
use time::OffsetDateTime;

use crate::errors::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "DESC",
            SortOrder::OldestFirst => "ASC",
        }
    }
}

/// A bounded scan over one device partition. There is no unbounded form:
/// every query carries a limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingQuery {
    pub device_id: String,
    /// Exclusive lower bound
    pub after: Option<OffsetDateTime>,
    /// Inclusive upper bound
    pub until: Option<OffsetDateTime>,
    pub limit: u32,
    pub order: SortOrder,
}

impl ReadingQuery {
    /// The most recent readings of a device.
    pub fn latest(device_id: &str, limit: u32) -> Self {
        Self {
            device_id: device_id.to_string(),
            after: None,
            until: None,
            limit,
            order: SortOrder::NewestFirst,
        }
    }

    /// Readings in the right-closed window `(after, until]`, newest first.
    pub fn window(device_id: &str, after: OffsetDateTime, until: OffsetDateTime, limit: u32) -> Self {
        Self {
            device_id: device_id.to_string(),
            after: Some(after),
            until: Some(until),
            limit,
            order: SortOrder::NewestFirst,
        }
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

/// Append-only time series of raw readings, partitioned by device.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError>;

    async fn query(&self, query: &ReadingQuery) -> Result<Vec<Reading>, StoreError>;
}

/// Aggregate records keyed by `(interval_label, window_end, device_id)`.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    /// Inserts the record or replaces the one with the same key.
    async fn upsert(&self, record: &AggregateRecord) -> Result<(), StoreError>;

    /// Records of an interval whose window ended strictly after `threshold`.
    async fn query_since(
        &self,
        interval_label: &str,
        threshold: OffsetDateTime,
    ) -> Result<Vec<AggregateRecord>, StoreError>;

    async fn find(&self, key: &AggregateKey) -> Result<Option<AggregateRecord>, StoreError>;
}
