use serde::{Deserialize, Serialize};

use crate::models::{AggregateRecord, QueryMode, QueryModeError};

/// Query string of the sensor data endpoint.
#[cfg_attr(feature = "docs", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "docs", into_params(parameter_in = Query))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorQuery {
    /// `raw` or `aggregated` (default)
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    /// `1d` (default), `1w` or `1m`; only used by aggregated queries
    pub range: Option<String>,
}

impl SensorQuery {
    pub fn mode(&self) -> Result<QueryMode, QueryModeError> {
        QueryMode::resolve(self.data_type.as_deref(), self.range.as_deref())
    }
}

/// Outcome classification carried by every response.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failure,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Success => "success",
            ResponseStatus::Failure => "failure",
        }
    }
}

/// Failure body shared by every endpoint.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureResponse {
    pub status: ResponseStatus,
    pub message: String,
}

/// Result of one aggregation trigger.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AggregateRecord>,
}

#[cfg(test)]
mod tests {
    use crate::models::TimeRange;

    use super::*;

    #[test]
    fn test_query_string_names() {
        let query: SensorQuery =
            serde_json::from_str(r#"{"type":"aggregated","range":"1m"}"#).unwrap();

        assert_eq!(query.mode(), Ok(QueryMode::Aggregated(TimeRange::Month)));
    }

    #[test]
    fn test_empty_query_is_one_day_of_aggregates() {
        assert_eq!(
            SensorQuery::default().mode(),
            Ok(QueryMode::Aggregated(TimeRange::Day))
        );
    }

    #[test]
    fn test_no_data_response_omits_data() {
        let response = AggregateResponse {
            status: ResponseStatus::Success,
            message: "No data in time range".to_string(),
            data: None,
        };

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "success");
        assert!(value.get("data").is_none());
    }
}
