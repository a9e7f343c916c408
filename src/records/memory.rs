use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{NewRegistration, RegistrationRecord};
use crate::records::{new_record, RecordStore};

/// Non-durable store used in offline/demo mode and tests
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<RegistrationRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<RegistrationRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, registration: NewRegistration) -> Result<RegistrationRecord> {
        let record = new_record(registration);
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.records.lock().await.len() as i64)
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}
