use async_trait::async_trait;
use dashmap::DashMap;

use super::KeyValueSlot;
use crate::error::StoreError;

/// Process-local slot. Contents are lost when the value is dropped.
#[derive(Default)]
pub struct MemorySlot {
    entries: DashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

#[async_trait]
impl KeyValueSlot for MemorySlot {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
