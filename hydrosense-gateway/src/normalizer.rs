use std::sync::Arc;

use hydrosense_api::{DeviceIdentity, ParseError, Reading, Telegram};
use time::OffsetDateTime;
use tokio::sync::mpsc;

use crate::sink::{ReadingSink, TransportError};

/// What happened to one telegram line.
#[derive(Debug)]
pub enum Outcome {
    /// Parsed and handed to the sink
    Forwarded(Reading),
    /// Malformed line, nothing was forwarded
    Rejected(ParseError),
    /// Parsed, but the sink refused it; the reading is gone
    Dropped(Reading, TransportError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub forwarded: u64,
    pub rejected: u64,
    pub dropped: u64,
}

impl IngestStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Forwarded(_) => self.forwarded += 1,
            Outcome::Rejected(_) => self.rejected += 1,
            Outcome::Dropped(..) => self.dropped += 1,
        }
    }
}

/// Turns device telegrams into readings attributed to the configured
/// device and gateway.
pub struct Normalizer {
    identity: DeviceIdentity,
    sink: Arc<dyn ReadingSink>,
}

impl Normalizer {
    pub fn new(identity: DeviceIdentity, sink: Arc<dyn ReadingSink>) -> Self {
        Self { identity, sink }
    }

    /// Parses one line and forwards the reading. Failures are logged and
    /// reported in the outcome, never raised.
    pub async fn process(&self, line: &str, received_at: OffsetDateTime) -> Outcome {
        let reading = match line
            .parse::<Telegram>()
            .and_then(|telegram| telegram.into_reading(&self.identity, received_at))
        {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!("rejected telegram {:?}: {}", line, e);
                return Outcome::Rejected(e);
            }
        };

        match self.sink.append(&reading).await {
            Ok(()) => {
                tracing::debug!(
                    "forwarded T={} pH={} at {}",
                    reading.temperature,
                    reading.ph,
                    reading.timestamp
                );
                Outcome::Forwarded(reading)
            }
            Err(e) => {
                tracing::error!("dropped reading received at {}: {}", reading.timestamp, e);
                Outcome::Dropped(reading, e)
            }
        }
    }

    /// Consumes lines one at a time until the source closes. Each line is
    /// stamped on arrival and processed to completion before the next one
    /// is pulled, which keeps readings in arrival order.
    pub async fn consume(&self, mut lines: mpsc::Receiver<String>) -> IngestStats {
        let mut stats = IngestStats::default();

        while let Some(line) = lines.recv().await {
            let outcome = self.process(&line, OffsetDateTime::now_utc()).await;
            stats.record(&outcome);
        }

        tracing::info!(
            "line source closed: {} forwarded, {} rejected, {} dropped",
            stats.forwarded,
            stats.rejected,
            stats.dropped
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::sink::MemorySink;

    fn normalizer(sink: Arc<MemorySink>) -> Normalizer {
        Normalizer::new(
            DeviceIdentity {
                device_id: "arduino_001".to_string(),
                gateway_id: "gateway_001".to_string(),
            },
            sink,
        )
    }

    #[tokio::test]
    async fn test_well_formed_line_forwarded() {
        let sink = Arc::new(MemorySink::new());
        let normalizer = normalizer(sink.clone());
        let received_at = datetime!(2024-05-01 08:00:00 UTC);

        let outcome = normalizer.process("T:23.45,pH:7.10", received_at).await;

        let Outcome::Forwarded(reading) = outcome else {
            panic!("expected forwarded outcome, got {outcome:?}");
        };
        assert_eq!(reading.temperature, 23.45);
        assert_eq!(reading.ph, 7.10);
        assert_eq!(reading.device_id, "arduino_001");
        assert_eq!(reading.gateway_id, "gateway_001");
        assert_eq!(reading.timestamp, received_at);
        assert_eq!(sink.readings(), vec![reading]);
    }

    #[tokio::test]
    async fn test_malformed_lines_rejected_without_forwarding() {
        let sink = Arc::new(MemorySink::new());
        let normalizer = normalizer(sink.clone());
        let received_at = datetime!(2024-05-01 08:00:00 UTC);

        for line in ["garbage", "T:abc,pH:1.0", "", "T:1.0"] {
            let outcome = normalizer.process(line, received_at).await;
            assert!(matches!(outcome, Outcome::Rejected(_)), "{line:?}: {outcome:?}");
        }

        assert!(sink.readings().is_empty());
    }

    #[tokio::test]
    async fn test_failed_append_drops_reading() {
        let sink = Arc::new(MemorySink::new());
        sink.set_available(false);
        let normalizer = normalizer(sink.clone());

        let outcome = normalizer
            .process("T:20.0,pH:7.0", datetime!(2024-05-01 08:00:00 UTC))
            .await;

        assert!(matches!(
            outcome,
            Outcome::Dropped(_, TransportError::Unavailable(_))
        ));

        sink.set_available(true);
        assert!(sink.readings().is_empty());
    }
}
