mod schema;
mod settings;
mod storage;

pub use schema::SchemaManager;
pub use settings::{Aggregator, Broker, BrokerTls, Database, Logger, Server, Settings, Telemetry};
pub use storage::Storage;
