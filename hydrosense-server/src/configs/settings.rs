use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub migration_path: Option<String>,
    pub clean_start: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    /// Partition key served and aggregated by this deployment
    pub device_id: String,
    /// Label stored on every aggregate record
    pub interval_label: String,
    /// Length of one aggregation window
    pub interval_secs: u64,
    /// Upper bound on readings fetched for one window
    pub window_limit: u32,
    /// Bound on every store operation
    pub store_timeout_ms: u64,
}

impl Telemetry {
    pub fn interval(&self) -> time::Duration {
        time::Duration::seconds(self.interval_secs as i64)
    }

    pub fn store_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.store_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregator {
    pub schedule_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerTls {
    pub ca_path: String,
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub keep_alive_secs: u64,
    pub tls: Option<BrokerTls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    pub telemetry: Telemetry,
    pub aggregator: Aggregator,
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
            .add_source(Environment::with_prefix("HYDROSENSE").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(tls) = &settings.broker.tls {
            settings.broker.tls = Some(BrokerTls {
                ca_path: normalize_path(&tls.ca_path)?,
                cert_path: normalize_path(&tls.cert_path)?,
                key_path: normalize_path(&tls.key_path)?,
            });
        }

        if let Some(migrate) = &settings.database.migration_path {
            settings.database.migration_path = if Path::new(migrate).is_dir() {
                Some(normalize_path(migrate)?)
            } else {
                None
            };
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
            .map_err(|e| ConfigError::Message(format!("{path}: {e}")))?
    };

    Ok(absolute.to_string_lossy().to_string())
}
