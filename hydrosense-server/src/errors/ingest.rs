use hydrosense_api::ReadingError;

use super::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Malformed envelope: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid reading: {0}")]
    Invalid(#[from] ReadingError),

    #[error("Append failed: {0}")]
    Store(#[from] StoreError),

    #[error("Broker error: {0}")]
    Broker(#[from] rumqttc::ClientError),
}
