use std::sync::Arc;

use tokio::sync::mpsc;

use crate::configs::Settings;
use crate::normalizer::{IngestStats, Normalizer};
use crate::sink::MqttSink;

pub mod configs;
pub mod normalizer;
pub mod serial;
pub mod sink;

/// Reads telegrams from the serial device and publishes readings until the
/// port closes.
pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<IngestStats> {
    let sink = MqttSink::connect(&settings.broker).map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "publishing to {}:{} on {}",
        settings.broker.host,
        settings.broker.port,
        settings.broker.topic
    );

    let (sender, receiver) = mpsc::channel(settings.serial.channel_capacity.max(1));
    let reader = serial::spawn_reader(&settings.serial, sender)?;

    let normalizer = Normalizer::new(settings.identity.clone(), Arc::new(sink));
    let stats = normalizer.consume(receiver).await;

    if !matches!(tokio::task::spawn_blocking(move || reader.join()).await, Ok(Ok(()))) {
        tracing::error!("serial reader thread panicked");
    }

    Ok(stats)
}
