use std::io::{BufRead, BufReader, ErrorKind};
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::configs::Serial;

/// Opens the serial device and forwards its lines on a dedicated blocking
/// thread. The thread ends when the port fails or the receiver is dropped.
pub fn spawn_reader(
    serial: &Serial,
    lines: mpsc::Sender<String>,
) -> Result<thread::JoinHandle<()>, serialport::Error> {
    let port = serialport::new(&serial.port_path, serial.baud_rate)
        .timeout(Duration::from_millis(serial.read_timeout_ms))
        .open()?;

    tracing::info!("serial port {} opened at {} baud", serial.port_path, serial.baud_rate);

    Ok(thread::spawn(move || forward_lines(BufReader::new(port), lines)))
}

/// Splits the byte stream on `\n` and sends each line without its
/// terminator. A read timeout keeps the partial line and waits again.
pub fn forward_lines<R: BufRead>(mut reader: R, lines: mpsc::Sender<String>) {
    let mut buffer = String::new();

    loop {
        match reader.read_line(&mut buffer) {
            Ok(0) => {
                tracing::info!("serial stream ended");
                break;
            }
            Ok(_) => {
                let line = buffer.trim_end_matches(['\r', '\n']).to_string();
                buffer.clear();

                if lines.blocking_send(line).is_err() {
                    tracing::debug!("line consumer closed");
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!("discarding non UTF-8 serial data: {}", e);
                buffer.clear();
            }
            Err(e) => {
                tracing::error!("Serial port error: {}", e);
                break;
            }
        }
    }
}
