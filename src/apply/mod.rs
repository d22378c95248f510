pub mod http;
pub mod simulated;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApplyError;

pub use http::HttpApply;
pub use simulated::SimulatedApply;

/// Performs the real-world effect of one queued action.
///
/// Retries are unbounded, so implementations should tolerate seeing the same
/// action more than once.
#[async_trait]
pub trait ApplyOperation: Send + Sync {
    async fn apply(&self, kind: &str, payload: &serde_json::Value) -> Result<(), ApplyError>;
}

/// Dispatches actions to the operation registered for their kind.
#[derive(Default)]
pub struct ApplyRouter {
    routes: HashMap<String, Arc<dyn ApplyOperation>>,
    fallback: Option<Arc<dyn ApplyOperation>>,
}

impl ApplyRouter {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            fallback: None,
        }
    }

    pub fn register(&mut self, kind: impl Into<String>, operation: Arc<dyn ApplyOperation>) {
        self.routes.insert(kind.into(), operation);
    }

    /// Operation used for kinds with no registered route.
    pub fn set_fallback(&mut self, operation: Arc<dyn ApplyOperation>) {
        self.fallback = Some(operation);
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn ApplyOperation>> {
        self.routes.get(kind).or(self.fallback.as_ref())
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }
}

#[async_trait]
impl ApplyOperation for ApplyRouter {
    async fn apply(&self, kind: &str, payload: &serde_json::Value) -> Result<(), ApplyError> {
        match self.get(kind) {
            Some(operation) => operation.apply(kind, payload).await,
            None => Err(ApplyError::from(format!("Unknown action kind: {kind}"))),
        }
    }
}
