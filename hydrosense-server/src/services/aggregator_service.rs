use std::sync::Arc;

use hydrosense_api::{AggregateRecord, Reading, epoch};
use time::OffsetDateTime;

use super::with_timeout;
use crate::configs::Telemetry;
use crate::errors::AggregateError;
use crate::repositories::{AggregateStore, ReadingQuery, ReadingStore};

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
    /// The window held no readings, nothing was written
    NoData,
    /// The record now stored under its key
    Written(AggregateRecord),
}

/// Average, minimum and maximum of one field, each rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl Statistics {
    pub fn of<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut mean = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        // Running mean, a plain sum overflows near f64::MAX
        for value in values {
            count += 1;
            mean += (value - mean) / count as f64;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            avg: round2(mean),
            min: round2(min),
            max: round2(max),
        })
    }
}

/// Rounds half away from zero to 2 decimal places. Values too large to
/// scale have no fractional part and are returned as is.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }

    scaled.round() / 100.0
}

/// Picks the reading whose gateway labels the aggregate: the latest one,
/// ties going to the greatest gateway id so store order never matters.
fn most_recent(readings: &[Reading]) -> Option<&Reading> {
    readings.iter().max_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.gateway_id.cmp(&b.gateway_id))
    })
}

/// Summarizes a window. `None` for an empty window, so a record with a
/// zero sample count cannot be built.
pub fn summarize(
    interval_label: &str,
    device_id: &str,
    window_end: OffsetDateTime,
    readings: &[Reading],
) -> Option<AggregateRecord> {
    let latest = most_recent(readings)?;
    let temperature = Statistics::of(readings.iter().map(|r| r.temperature))?;
    let ph = Statistics::of(readings.iter().map(|r| r.ph))?;

    Some(AggregateRecord {
        interval_label: interval_label.to_string(),
        window_end,
        device_id: device_id.to_string(),
        gateway_id: latest.gateway_id.clone(),
        avg_temperature: temperature.avg,
        min_temperature: temperature.min,
        max_temperature: temperature.max,
        avg_ph: ph.avg,
        min_ph: ph.min,
        max_ph: ph.max,
        sample_count: readings.len() as u32,
    })
}

/// Computes the aggregate of the trailing window on each trigger.
///
/// Runs for the same window are not de-duplicated here; the trigger is
/// expected to be single-flight and the last upsert wins.
pub struct Aggregator {
    readings: Arc<dyn ReadingStore>,
    aggregates: Arc<dyn AggregateStore>,
    telemetry: Telemetry,
}

impl Aggregator {
    pub fn new(
        readings: Arc<dyn ReadingStore>,
        aggregates: Arc<dyn AggregateStore>,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            readings,
            aggregates,
            telemetry,
        }
    }

    /// Aggregates the window `(now - interval, now]`.
    pub async fn run(&self, now: OffsetDateTime) -> Result<AggregateOutcome, AggregateError> {
        let window_end = epoch::truncate(now);
        let window_start = window_end - self.telemetry.interval();
        let timeout = self.telemetry.store_timeout();

        let query = ReadingQuery::window(
            &self.telemetry.device_id,
            window_start,
            window_end,
            self.telemetry.window_limit,
        );
        let readings = with_timeout(timeout, self.readings.query(&query))
            .await
            .map_err(AggregateError::Query)?;

        tracing::debug!(
            "{} readings between {} and {}",
            readings.len(),
            window_start,
            window_end
        );

        if readings.len() >= self.telemetry.window_limit as usize {
            tracing::warn!(
                "window ending {} hit the limit of {} readings, older readings are left out",
                window_end,
                self.telemetry.window_limit
            );
        }

        let Some(record) = summarize(
            &self.telemetry.interval_label,
            &self.telemetry.device_id,
            window_end,
            &readings,
        ) else {
            tracing::info!("no data in window ending {}", window_end);
            return Ok(AggregateOutcome::NoData);
        };

        with_timeout(timeout, self.aggregates.upsert(&record))
            .await
            .map_err(AggregateError::Write)?;

        tracing::info!(
            "saved {} aggregate ending {} over {} samples",
            record.interval_label,
            record.window_end,
            record.sample_count
        );

        Ok(AggregateOutcome::Written(record))
    }
}
