pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;
pub mod apply;
pub mod sync;
pub mod auto_sync;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::apply::{ApplyOperation, HttpApply, SimulatedApply};
use crate::config::{Config, StoreBackend};
use crate::error::StoreError;
use crate::storage::{FileSlot, KeyValueSlot, MemorySlot, PgSlot};
use crate::store::ActionStore;
use crate::sync::{SyncOptions, Synchronizer};

pub async fn build_store(config: &Config) -> Result<ActionStore, StoreError> {
    let slot: Arc<dyn KeyValueSlot> = match &config.store {
        StoreBackend::Memory => Arc::new(MemorySlot::new()),
        StoreBackend::File(dir) => {
            tracing::debug!("Using file slot in {}", dir.display());
            Arc::new(FileSlot::new(dir.clone()))
        }
        StoreBackend::Postgres(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| StoreError::Persistence(format!("Failed to run migrations: {e}")))?;

            tracing::info!("Migrations applied");
            Arc::new(PgSlot::new(pool))
        }
    };

    Ok(ActionStore::new(slot, config.store_key.clone()))
}

pub fn build_apply(config: &Config) -> Result<Arc<dyn ApplyOperation>, String> {
    match &config.apply_url {
        Some(url) => {
            tracing::info!("Replaying actions to {url}");
            let apply = HttpApply::new(url.clone()).map_err(|e| e.to_string())?;
            Ok(Arc::new(apply))
        }
        None => {
            tracing::info!(
                "No HEALTHSYNC_APPLY_URL set, using simulated backend (failure rate {})",
                config.failure_rate
            );
            Ok(Arc::new(SimulatedApply::new(config.failure_rate)))
        }
    }
}

pub async fn build_synchronizer(config: &Config) -> Result<Synchronizer, Box<dyn std::error::Error>> {
    let store = build_store(config).await?;
    let apply = build_apply(config)?;
    let options = SyncOptions {
        pacing: config.pacing,
        apply_timeout: config.apply_timeout,
    };
    Ok(Synchronizer::new(store, apply, options))
}
