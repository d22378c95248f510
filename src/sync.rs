use std::sync::Arc;
use std::time::Duration;

use crate::apply::ApplyOperation;
use crate::error::{ApplyError, StoreError};
use crate::models::OfflineAction;
use crate::store::ActionStore;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Pause between two consecutive replays.
    pub pacing: Duration,
    /// Upper bound on a single apply call. `None` leaves timeouts to the
    /// apply operation itself.
    pub apply_timeout: Option<Duration>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(100),
            apply_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedAction {
    pub id: String,
    pub kind: String,
    pub error: ApplyError,
}

/// Outcome of one pass over the pending queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Ids replayed successfully and removed from the store, in queue order.
    pub synced: Vec<String>,
    /// Actions whose replay failed; they are still pending.
    pub failed: Vec<FailedAction>,
}

impl SyncReport {
    pub fn attempted(&self) -> usize {
        self.synced.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Replays pending actions against an [`ApplyOperation`].
///
/// Two runs must never overlap on the same store: a second run would replay
/// actions the first has applied but not yet removed. Delivery is
/// at-least-once; an interrupted run may replay actions again next time.
pub struct Synchronizer {
    store: ActionStore,
    apply: Arc<dyn ApplyOperation>,
    options: SyncOptions,
}

impl Synchronizer {
    pub fn new(store: ActionStore, apply: Arc<dyn ApplyOperation>, options: SyncOptions) -> Self {
        Self {
            store,
            apply,
            options,
        }
    }

    pub fn store(&self) -> &ActionStore {
        &self.store
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub async fn sync_all(&self) -> Result<Vec<String>, StoreError> {
        self.sync_all_with_progress(|_| {}).await
    }

    /// Like [`Synchronizer::sync_all`], reporting percent complete after
    /// every attempt.
    pub async fn sync_all_with_progress<F>(&self, on_progress: F) -> Result<Vec<String>, StoreError>
    where
        F: FnMut(f64),
    {
        Ok(self.run(on_progress).await?.synced)
    }

    /// Replay a snapshot of the queue in order, then drop the actions that
    /// went through. Apply failures are collected in the report; only store
    /// errors abort the run.
    pub async fn run<F>(&self, mut on_progress: F) -> Result<SyncReport, StoreError>
    where
        F: FnMut(f64),
    {
        let snapshot = self.store.list().await?;
        let total = snapshot.len();
        let mut report = SyncReport::default();

        if total == 0 {
            tracing::debug!("No offline actions to sync");
            return Ok(report);
        }

        tracing::info!("Syncing {total} offline action(s)");

        for (index, action) in snapshot.into_iter().enumerate() {
            match self.apply_one(&action).await {
                Ok(()) => {
                    tracing::debug!("Synced action {} (type={})", action.id, action.kind);
                    report.synced.push(action.id);
                }
                Err(error) => {
                    tracing::warn!("Failed to sync action {}: {error}", action.id);
                    report.failed.push(FailedAction {
                        id: action.id,
                        kind: action.kind,
                        error,
                    });
                }
            }

            on_progress((index + 1) as f64 / total as f64 * 100.0);

            if index + 1 < total && !self.options.pacing.is_zero() {
                tokio::time::sleep(self.options.pacing).await;
            }
        }

        self.store.remove_by_ids(&report.synced).await?;

        tracing::info!(
            "Sync finished: {} synced, {} still pending",
            report.synced.len(),
            report.failed.len()
        );

        Ok(report)
    }

    async fn apply_one(&self, action: &OfflineAction) -> Result<(), ApplyError> {
        let call = self.apply.apply(&action.kind, &action.payload);
        match self.options.apply_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(ApplyError::timed_out(limit)),
            },
            None => call.await,
        }
    }
}
