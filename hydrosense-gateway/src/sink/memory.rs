use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use hydrosense_api::Reading;

use super::{ReadingSink, TransportError};

/// Collects readings in memory. `set_available(false)` simulates a broken
/// transport.
#[derive(Default)]
pub struct MemorySink {
    readings: Mutex<Vec<Reading>>,
    unavailable: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.readings
            .lock()
            .map(|readings| readings.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReadingSink for MemorySink {
    async fn append(&self, reading: &Reading) -> Result<(), TransportError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable("memory sink offline".into()));
        }

        self.readings
            .lock()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?
            .push(reading.clone());

        Ok(())
    }
}
