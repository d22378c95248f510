#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use healthsync::apply::ApplyOperation;
use healthsync::error::{ApplyError, StoreError};
use healthsync::models::OfflineAction;
use healthsync::storage::{KeyValueSlot, MemorySlot};
use healthsync::store::ActionStore;
use healthsync::sync::{SyncOptions, Synchronizer};

type Decide = dyn Fn(usize, &str, &Value) -> bool + Send + Sync;

/// Deterministic apply operation. `decide` gets the zero-based call index,
/// the action kind and payload, and returns whether the call succeeds.
pub struct ScriptedApply {
    decide: Box<Decide>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Value)>>,
    delay: Duration,
}

impl ScriptedApply {
    pub fn new(decide: impl Fn(usize, &str, &Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            decide: Box::new(decide),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn always_ok() -> Self {
        Self::new(|_, _, _| true)
    }

    pub fn always_fail() -> Self {
        Self::new(|_, _, _| false)
    }

    /// Fails every action whose payload carries `"fail": true`.
    pub fn fail_flagged() -> Self {
        Self::new(|_, _, payload| payload["fail"] != Value::Bool(true))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, Value)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApplyOperation for ScriptedApply {
    async fn apply(&self, kind: &str, payload: &Value) -> Result<(), ApplyError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((kind.to_string(), payload.clone()));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if (self.decide)(index, kind, payload) {
            Ok(())
        } else {
            Err(ApplyError::from("Network error"))
        }
    }
}

/// Slot that reads normally but refuses every write and delete.
pub struct ReadOnlySlot {
    inner: MemorySlot,
}

impl ReadOnlySlot {
    pub fn new() -> Self {
        Self {
            inner: MemorySlot::new(),
        }
    }

    pub async fn seed(&self, key: &str, value: &str) {
        self.inner.write(key, value).await.unwrap();
    }
}

#[async_trait]
impl KeyValueSlot for ReadOnlySlot {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.read(key).await
    }

    async fn write(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Persistence("quota exceeded".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Persistence("storage unavailable".to_string()))
    }
}

/// Slot whose reads start failing once `reads_allowed` reads have succeeded.
pub struct FlakySlot {
    inner: MemorySlot,
    reads: AtomicUsize,
    reads_allowed: usize,
}

impl FlakySlot {
    pub fn failing_reads_after(reads_allowed: usize) -> Self {
        Self {
            inner: MemorySlot::new(),
            reads: AtomicUsize::new(0),
            reads_allowed,
        }
    }

    pub async fn seed(&self, key: &str, value: &str) {
        self.inner.write(key, value).await.unwrap();
    }
}

#[async_trait]
impl KeyValueSlot for FlakySlot {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.reads.fetch_add(1, Ordering::SeqCst) >= self.reads_allowed {
            return Err(StoreError::Persistence("storage unavailable".to_string()));
        }
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.write(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key).await
    }
}

pub fn memory_store() -> (Arc<MemorySlot>, ActionStore) {
    let slot = Arc::new(MemorySlot::new());
    let store = ActionStore::new(slot.clone(), ActionStore::DEFAULT_KEY);
    (slot, store)
}

pub fn synchronizer(store: ActionStore, apply: Arc<ScriptedApply>) -> Synchronizer {
    Synchronizer::new(
        store,
        apply,
        SyncOptions {
            pacing: Duration::ZERO,
            apply_timeout: None,
        },
    )
}

pub fn action(id: &str, payload: Value) -> OfflineAction {
    OfflineAction::with_id(id, "x", payload)
}

pub fn ids(actions: &[OfflineAction]) -> Vec<String> {
    actions.iter().map(|a| a.id.clone()).collect()
}
