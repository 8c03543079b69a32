use std::io::Cursor;
use std::sync::Arc;

use hydrosense_api::DeviceIdentity;
use hydrosense_gateway::normalizer::{IngestStats, Normalizer};
use hydrosense_gateway::serial::forward_lines;
use hydrosense_gateway::sink::MemorySink;
use tokio::sync::mpsc;

fn identity() -> DeviceIdentity {
    DeviceIdentity {
        device_id: "arduino_001".to_string(),
        gateway_id: "gateway_001".to_string(),
    }
}

#[tokio::test]
async fn test_stream_continues_past_malformed_lines() {
    let sink = Arc::new(MemorySink::new());
    let normalizer = Normalizer::new(identity(), sink.clone());

    let (sender, receiver) = mpsc::channel(8);
    for line in ["T:20.0,pH:7.0", "garbage", "T:abc,pH:1.0", "T:22.0,pH:7.2"] {
        sender.send(line.to_string()).await.unwrap();
    }
    drop(sender);

    let stats = normalizer.consume(receiver).await;

    assert_eq!(
        stats,
        IngestStats {
            forwarded: 2,
            rejected: 2,
            dropped: 0
        }
    );

    let readings = sink.readings();
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].temperature, 20.0);
    assert_eq!(readings[1].temperature, 22.0);
    assert!(readings[0].timestamp <= readings[1].timestamp);
}

#[tokio::test]
async fn test_transport_failure_is_not_fatal() {
    let sink = Arc::new(MemorySink::new());
    sink.set_available(false);
    let normalizer = Normalizer::new(identity(), sink.clone());

    let (sender, receiver) = mpsc::channel(8);
    sender.send("T:20.0,pH:7.0".to_string()).await.unwrap();
    sender.send("T:21.0,pH:7.1".to_string()).await.unwrap();
    drop(sender);

    let stats = normalizer.consume(receiver).await;

    assert_eq!(stats.dropped, 2);
    assert_eq!(stats.forwarded, 0);
    assert!(sink.readings().is_empty());
}

#[tokio::test]
async fn test_serial_bytes_to_readings_in_order() {
    let sink = Arc::new(MemorySink::new());
    let normalizer = Normalizer::new(identity(), sink.clone());

    let (sender, receiver) = mpsc::channel(1);
    let reader = std::thread::spawn(move || {
        forward_lines(
            Cursor::new(b"T:24.13,pH:2.27\r\nnoise\r\nT:24.50,pH:2.31\r\n".to_vec()),
            sender,
        )
    });

    let stats = normalizer.consume(receiver).await;
    reader.join().unwrap();

    assert_eq!(stats.forwarded, 2);
    assert_eq!(stats.rejected, 1);

    let temperatures: Vec<f64> = sink.readings().iter().map(|r| r.temperature).collect();
    assert_eq!(temperatures, vec![24.13, 24.50]);
}
