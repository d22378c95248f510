use std::collections::HashSet;
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::OfflineAction;
use crate::storage::KeyValueSlot;

/// Pending offline actions, kept as one JSON array under a single slot key.
///
/// Every mutation is a full read-modify-write of that array. The store does
/// no locking of its own: callers must not interleave mutations from several
/// tasks against the same key.
#[derive(Clone)]
pub struct ActionStore {
    slot: Arc<dyn KeyValueSlot>,
    key: String,
}

impl ActionStore {
    pub const DEFAULT_KEY: &'static str = "healthcare_offline_actions";

    pub fn new(slot: Arc<dyn KeyValueSlot>, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append an action to the end of the queue. Rejects an id that is
    /// already pending.
    pub async fn append(&self, action: OfflineAction) -> Result<(), StoreError> {
        let mut actions = self.list().await?;
        if actions.iter().any(|a| a.id == action.id) {
            return Err(StoreError::DuplicateId(action.id));
        }

        tracing::debug!("Queueing offline action {} (type={})", action.id, action.kind);
        actions.push(action);
        self.save(&actions).await
    }

    /// All pending actions in insertion order. Missing or unparseable slot
    /// contents read as an empty queue.
    pub async fn list(&self) -> Result<Vec<OfflineAction>, StoreError> {
        let Some(raw) = self.slot.read(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<OfflineAction>>(&raw) {
            Ok(actions) => Ok(actions),
            Err(e) => {
                tracing::warn!("Discarding unreadable offline queue '{}': {e}", self.key);
                Ok(Vec::new())
            }
        }
    }

    pub async fn remove_by_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }

        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let actions = self.list().await?;
        let before = actions.len();
        let remaining: Vec<OfflineAction> = actions
            .into_iter()
            .filter(|a| !ids.contains(a.id.as_str()))
            .collect();

        tracing::debug!(
            "Removing {} synced action(s) from '{}'",
            before - remaining.len(),
            self.key
        );
        self.save(&remaining).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.slot.delete(&self.key).await?;
        tracing::info!("Offline queue '{}' cleared", self.key);
        Ok(())
    }

    pub async fn pending_count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    async fn save(&self, actions: &[OfflineAction]) -> Result<(), StoreError> {
        let json = serde_json::to_string(actions)?;
        self.slot.write(&self.key, &json).await
    }
}
