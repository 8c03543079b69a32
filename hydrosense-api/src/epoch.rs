//! Millisecond epoch helpers.
//!
//! Readings and aggregates travel at millisecond precision so that a value
//! read back from a store compares equal to the value written.

use time::OffsetDateTime;
use time::error::ComponentRange;

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Milliseconds since the unix epoch, rounded toward negative infinity.
pub fn to_millis(time: OffsetDateTime) -> i64 {
    time.unix_timestamp_nanos().div_euclid(NANOS_PER_MILLI) as i64
}

pub fn from_millis(millis: i64) -> Result<OffsetDateTime, ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * NANOS_PER_MILLI)
}

/// Drops sub-millisecond precision and normalizes the offset to UTC.
pub fn truncate(time: OffsetDateTime) -> OffsetDateTime {
    from_millis(to_millis(time)).unwrap_or(time)
}
