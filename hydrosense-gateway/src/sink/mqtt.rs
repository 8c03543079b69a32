use std::fs;
use std::time::Duration;

use async_trait::async_trait;
use hydrosense_api::Reading;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, TlsConfiguration, Transport};
use tokio::task::JoinHandle;

use super::{ReadingSink, TransportError};
use crate::configs::Broker;

/// Publishes each reading as a JSON envelope on the ingestion topic.
///
/// Publishing only enqueues on the client's bounded request queue; the
/// event loop delivers it. Readings already queued when the broker drops
/// are retried by the client, but once `queue_capacity` readings wait
/// the next append fails at once and that reading is dropped.
pub struct MqttSink {
    client: AsyncClient,
    topic: String,
    event_loop: JoinHandle<()>,
}

impl MqttSink {
    pub fn connect(broker: &Broker) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
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

        let (client, event_loop) = AsyncClient::new(options, broker.queue_capacity.max(1));
        let event_loop = tokio::spawn(drive(event_loop));

        Ok(Self::with_client(client, &broker.topic, event_loop))
    }

    fn with_client(client: AsyncClient, topic: &str, event_loop: JoinHandle<()>) -> Self {
        Self {
            client,
            topic: topic.to_string(),
            event_loop,
        }
    }
}

impl Drop for MqttSink {
    fn drop(&mut self) {
        self.event_loop.abort();
    }
}

#[async_trait]
impl ReadingSink for MqttSink {
    async fn append(&self, reading: &Reading) -> Result<(), TransportError> {
        let payload = serde_json::to_vec(reading)?;

        self.client
            .try_publish(&self.topic, QoS::AtLeastOnce, false, payload)?;

        tracing::debug!("published reading at {} to {}", reading.timestamp, self.topic);

        Ok(())
    }
}

async fn drive(mut event_loop: EventLoop) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => tracing::info!("connected to broker"),
            Ok(_) => {}
            Err(e) => {
                tracing::error!("MQTT error: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
