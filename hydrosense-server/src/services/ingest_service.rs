use std::fs;
use std::sync::Arc;
use std::time::Duration;

use hydrosense_api::{Reading, epoch};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, TlsConfiguration, Transport};
use tokio::task::JoinHandle;

use super::with_timeout;
use crate::configs::Broker;
use crate::errors::IngestError;
use crate::repositories::ReadingStore;

/// Subscribes to the ingestion topic and appends every published reading
/// to the reading store.
pub struct IngestService {
    client: AsyncClient,
    event_loop: EventLoop,
    topic: String,
    readings: Arc<dyn ReadingStore>,
    store_timeout: Duration,
}

impl IngestService {
    pub fn new(
        broker: &Broker,
        readings: Arc<dyn ReadingStore>,
        store_timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut options = MqttOptions::new(&broker.client_id, &broker.host, broker.port);
        options.set_keep_alive(Duration::from_secs(broker.keep_alive_secs));

        if let Some(tls) = &broker.tls {
            let ca = fs::read(&tls.ca_path)?;
            let cert = fs::read(&tls.cert_path)?;
            let key = fs::read(&tls.key_path)?;

            options.set_transport(Transport::Tls(TlsConfiguration::Simple {
                ca,
                alpn: None,
                client_auth: Some((cert, key)),
            }));
        }

        let (client, event_loop) = AsyncClient::new(options, 10);

        Ok(Self {
            client,
            event_loop,
            topic: broker.topic.clone(),
            readings,
            store_timeout,
        })
    }

    /// Drives the connection until the task is aborted. The subscription is
    /// renewed on every (re)connect since the session is not persistent.
    pub fn spawn(self) -> JoinHandle<()> {
        let Self {
            client,
            mut event_loop,
            topic,
            readings,
            store_timeout,
        } = self;

        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        match client.try_subscribe(&topic, QoS::AtLeastOnce) {
                            Ok(()) => tracing::info!("subscribed to {}", topic),
                            Err(e) => tracing::error!("{}", IngestError::from(e)),
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        if let Err(e) =
                            handle_payload(readings.as_ref(), &publish.payload, store_timeout).await
                        {
                            tracing::warn!("skipped message on {}: {}", publish.topic, e);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("MQTT error: {}", e);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        })
    }
}

/// Decodes one envelope and appends it. Nothing is retried.
pub async fn handle_payload(
    readings: &dyn ReadingStore,
    payload: &[u8],
    store_timeout: Duration,
) -> Result<Reading, IngestError> {
    let mut reading: Reading = serde_json::from_slice(payload)?;
    reading.validate()?;
    reading.timestamp = epoch::truncate(reading.timestamp);

    tracing::debug!("receive: {:?}", reading);

    with_timeout(store_timeout, readings.append(&reading)).await?;

    Ok(reading)
}
