use std::env;
use std::io;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use hydrosense_api::DeviceIdentity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Serial {
    pub port_path: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    /// Lines read ahead of the consumer
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerTls {
    pub ca_path: String,
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub keep_alive_secs: u64,
    pub queue_capacity: usize,
    pub tls: Option<BrokerTls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub identity: DeviceIdentity,
    pub serial: Serial,
    pub broker: Broker,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());
        let config_dir = env::var("CONFIG_DIR")
            .unwrap_or_else(|_| concat!(env!("CARGO_MANIFEST_DIR"), "/configs").into());

        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/default")))
            .add_source(File::with_name(&format!("{config_dir}/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("GATEWAY").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(tls) = &settings.broker.tls {
            settings.broker.tls = Some(BrokerTls {
                ca_path: normalize_path(&tls.ca_path)?,
                cert_path: normalize_path(&tls.cert_path)?,
                key_path: normalize_path(&tls.key_path)?,
            });
        }

        Ok(settings)
    }
}

fn normalize_path(path: &str) -> Result<String, ConfigError> {
    let path_buf = PathBuf::from(path);

    let absolute = if path_buf.is_absolute() {
        path_buf
    } else {
        env::current_dir()
            .and_then(|dir| dir.join(&path_buf).canonicalize())
            .map_err(|e: io::Error| ConfigError::Message(format!("{path}: {e}")))?
    };

    Ok(absolute.to_string_lossy().to_string())
}
