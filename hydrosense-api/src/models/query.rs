use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryModeError {
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("unsupported range: {0}")]
    UnsupportedRange(String),
}

/// Lookback window of an aggregated query.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1w")]
    Week,
    #[serde(rename = "1m")]
    Month,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "1d",
            TimeRange::Week => "1w",
            TimeRange::Month => "1m",
        }
    }

    pub fn lookback(&self) -> Duration {
        match self {
            TimeRange::Day => Duration::hours(24),
            TimeRange::Week => Duration::days(7),
            TimeRange::Month => Duration::days(30),
        }
    }
}

impl FromStr for TimeRange {
    type Err = QueryModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "1d" => Ok(TimeRange::Day),
            "1w" => Ok(TimeRange::Week),
            "1m" => Ok(TimeRange::Month),
            other => Err(QueryModeError::UnsupportedRange(other.to_string())),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a query asks for. Each variant has its own response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Latest raw readings, newest first
    Raw,
    /// Aggregate records whose window ended within the lookback
    Aggregated(TimeRange),
}

impl Default for QueryMode {
    fn default() -> Self {
        QueryMode::Aggregated(TimeRange::default())
    }
}

impl QueryMode {
    /// Resolves the optional `type` and `range` request parameters.
    ///
    /// A missing type means aggregated and a missing range means one day.
    /// Anything unrecognized is an error, never a fallback.
    pub fn resolve(data_type: Option<&str>, range: Option<&str>) -> Result<Self, QueryModeError> {
        match data_type.unwrap_or("aggregated") {
            "raw" => Ok(QueryMode::Raw),
            "aggregated" => {
                let range = range.map(TimeRange::from_str).transpose()?;
                Ok(QueryMode::Aggregated(range.unwrap_or_default()))
            }
            other => Err(QueryModeError::UnsupportedType(other.to_string())),
        }
    }
}
