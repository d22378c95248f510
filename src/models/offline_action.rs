use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user action recorded while offline, waiting to be replayed.
///
/// Field names on the wire follow the layout the web client already writes
/// to its storage slot (`type`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub synced: bool,
}

impl OfflineAction {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::with_id(Uuid::now_v7().to_string(), kind, payload)
    }

    pub fn with_id(
        id: impl Into<String>,
        kind: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            payload,
            created_at: Utc::now(),
            synced: false,
        }
    }
}
