use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::sync::Synchronizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

/// What a UI needs to render the sync indicator.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Offline { pending: usize },
    Syncing { progress: f64 },
    Idle { pending: usize },
    Failed { message: String, pending: usize },
}

/// Background task that drains the queue whenever the connection comes back
/// or a sync is requested.
///
/// Every run happens on the one task, so runs are serialized.
pub struct AutoSync {
    handle: JoinHandle<()>,
    trigger: mpsc::Sender<()>,
    status: watch::Receiver<SyncStatus>,
}

impl AutoSync {
    pub fn spawn(
        synchronizer: Arc<Synchronizer>,
        connectivity: watch::Receiver<Connectivity>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let (status_tx, status) = watch::channel(SyncStatus::Idle { pending: 0 });
        // A single slot coalesces repeated requests into one run.
        let (trigger, trigger_rx) = mpsc::channel(1);

        let handle = tokio::spawn(run(synchronizer, connectivity, trigger_rx, status_tx, shutdown));

        Self {
            handle,
            trigger,
            status,
        }
    }

    /// Ask for a sync. Ignored while offline.
    pub fn request_sync(&self) {
        let _ = self.trigger.try_send(());
    }

    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Wait for the task to exit after shutdown was signaled.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!("Auto-sync task panicked: {e}");
        }
    }
}

async fn run(
    synchronizer: Arc<Synchronizer>,
    mut connectivity: watch::Receiver<Connectivity>,
    mut trigger: mpsc::Receiver<()>,
    status: watch::Sender<SyncStatus>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut online = *connectivity.borrow_and_update() == Connectivity::Online;
    tracing::debug!("Auto-sync started (online={online})");

    if online {
        sync_once(&synchronizer, &status).await;
    } else {
        publish_offline(&synchronizer, &status).await;
    }

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = connectivity.changed() => {
                if changed.is_err() {
                    break;
                }
                let now_online = *connectivity.borrow_and_update() == Connectivity::Online;
                if now_online && !online {
                    tracing::info!("Connection restored, syncing offline queue");
                    online = true;
                    sync_once(&synchronizer, &status).await;
                } else if !now_online && online {
                    tracing::info!("Connection lost, queueing actions offline");
                    online = false;
                    publish_offline(&synchronizer, &status).await;
                }
            }
            Some(()) = trigger.recv() => {
                if online {
                    sync_once(&synchronizer, &status).await;
                } else {
                    tracing::debug!("Sync requested while offline, skipping");
                }
            }
        }
    }

    tracing::debug!("Auto-sync stopped");
}

async fn sync_once(synchronizer: &Synchronizer, status: &watch::Sender<SyncStatus>) {
    let last = last_pending(&status.borrow());
    status.send_replace(SyncStatus::Syncing { progress: 0.0 });

    let outcome = synchronizer
        .run(|progress| {
            status.send_replace(SyncStatus::Syncing { progress });
        })
        .await;

    let pending = count_pending(synchronizer, last).await;

    let next = match outcome {
        Ok(report) if report.is_clean() => SyncStatus::Idle { pending },
        Ok(report) => SyncStatus::Failed {
            message: format!(
                "Sync failed for {} action(s), please retry",
                report.failed.len()
            ),
            pending,
        },
        Err(e) => {
            tracing::error!("Sync run aborted: {e}");
            SyncStatus::Failed {
                message: e.to_string(),
                pending,
            }
        }
    };
    status.send_replace(next);
}

async fn publish_offline(synchronizer: &Synchronizer, status: &watch::Sender<SyncStatus>) {
    let last = last_pending(&status.borrow());
    let pending = count_pending(synchronizer, last).await;
    status.send_replace(SyncStatus::Offline { pending });
}

/// Pending count from the store, or `last` when the store cannot be read.
async fn count_pending(synchronizer: &Synchronizer, last: usize) -> usize {
    match synchronizer.store().pending_count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Failed to count pending actions, keeping last count {last}: {e}");
            last
        }
    }
}

fn last_pending(status: &SyncStatus) -> usize {
    match status {
        SyncStatus::Offline { pending }
        | SyncStatus::Idle { pending }
        | SyncStatus::Failed { pending, .. } => *pending,
        SyncStatus::Syncing { .. } => 0,
    }
}
