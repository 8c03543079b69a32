mod memory;
mod mqtt;

pub use memory::MemorySink;
pub use mqtt::MqttSink;

use async_trait::async_trait;
use hydrosense_api::Reading;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Publish error: {0}")]
    Publish(#[from] rumqttc::ClientError),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination of normalized readings, the ingestion side of the reading
/// store.
#[async_trait]
pub trait ReadingSink: Send + Sync {
    /// Hands one reading over. A failed append is final: the caller drops
    /// the reading.
    async fn append(&self, reading: &Reading) -> Result<(), TransportError>;
}
