use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{AggregateOutcome, Aggregator};

/// Runs the aggregator every `period`. Each run is awaited before the next
/// tick, so runs never overlap; ticks missed meanwhile are skipped.
pub fn spawn_scheduler(aggregator: Arc<Aggregator>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match aggregator.run(OffsetDateTime::now_utc()).await {
                Ok(AggregateOutcome::Written(record)) => tracing::debug!(
                    "scheduled aggregation wrote window ending {}",
                    record.window_end
                ),
                Ok(AggregateOutcome::NoData) => {
                    tracing::debug!("scheduled aggregation found no data")
                }
                Err(e) => tracing::error!("scheduled aggregation failed: {}", e),
            }
        }
    })
}
