use std::path::PathBuf;
use std::time::Duration;

use crate::store::ActionStore;

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub store_key: String,
    pub pacing: Duration,
    pub apply_timeout: Option<Duration>,
    pub apply_url: Option<String>,
    pub failure_rate: f64,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Memory,
    File(PathBuf),
    Postgres(String),
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let store = match env_or("HEALTHSYNC_STORE_BACKEND", "file").as_str() {
            "memory" => StoreBackend::Memory,
            "file" => StoreBackend::File(PathBuf::from(env_or("HEALTHSYNC_STORE_DIR", ".healthsync"))),
            "postgres" => StoreBackend::Postgres(env_required("DATABASE_URL")?),
            other => return Err(format!("Invalid HEALTHSYNC_STORE_BACKEND: {other}")),
        };

        let store_key = env_or("HEALTHSYNC_STORE_KEY", ActionStore::DEFAULT_KEY);
        if store_key.trim().is_empty() {
            return Err("HEALTHSYNC_STORE_KEY must not be empty".to_string());
        }

        let pacing_ms: u64 = env_or("HEALTHSYNC_PACING_MS", "100")
            .parse()
            .map_err(|e| format!("Invalid HEALTHSYNC_PACING_MS: {e}"))?;

        let apply_timeout = match std::env::var("HEALTHSYNC_APPLY_TIMEOUT_SECS").ok() {
            Some(secs) => Some(Duration::from_secs(
                secs.parse()
                    .map_err(|e| format!("Invalid HEALTHSYNC_APPLY_TIMEOUT_SECS: {e}"))?,
            )),
            None => None,
        };

        let apply_url = std::env::var("HEALTHSYNC_APPLY_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let failure_rate: f64 = env_or("HEALTHSYNC_FAILURE_RATE", "0.1")
            .parse()
            .map_err(|e| format!("Invalid HEALTHSYNC_FAILURE_RATE: {e}"))?;
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(format!(
                "Invalid HEALTHSYNC_FAILURE_RATE: {failure_rate} is outside 0..=1"
            ));
        }

        let log_level = env_or("HEALTHSYNC_LOG_LEVEL", "info");

        Ok(Config {
            store,
            store_key,
            pacing: Duration::from_millis(pacing_ms),
            apply_timeout,
            apply_url,
            failure_rate,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
