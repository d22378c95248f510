pub mod file;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;

pub use file::FileSlot;
pub use memory::MemorySlot;
pub use postgres::PgSlot;

/// A named slot holding one serialized value per key.
#[async_trait]
pub trait KeyValueSlot: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a key that was never written succeeds.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
