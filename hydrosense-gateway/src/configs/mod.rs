mod settings;

pub use settings::{Broker, BrokerTls, Logger, Serial, Settings};
