use std::fmt;

/// Errors raised by the persistent slot and the action store built on it.
#[derive(Debug)]
pub enum StoreError {
    Persistence(String),
    Io(std::io::Error),
    Database(sqlx::Error),
    Serialization(serde_json::Error),
    DuplicateId(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Persistence(msg) => write!(f, "Persistence Error: {msg}"),
            StoreError::Io(err) => write!(f, "Storage I/O Error: {err}"),
            StoreError::Database(err) => write!(f, "Database Error: {err}"),
            StoreError::Serialization(err) => write!(f, "Serialization Error: {err}"),
            StoreError::DuplicateId(id) => write!(f, "Duplicate action id: {id}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Database(err) => Some(err),
            StoreError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}

/// A single action's replay failed. Never escapes a sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyError {
    pub message: String,
}

impl ApplyError {
    pub fn timed_out(after: std::time::Duration) -> Self {
        ApplyError {
            message: format!("Apply timed out after {}ms", after.as_millis()),
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApplyError {}

impl From<String> for ApplyError {
    fn from(s: String) -> Self {
        ApplyError { message: s }
    }
}

impl From<&str> for ApplyError {
    fn from(s: &str) -> Self {
        ApplyError {
            message: s.to_string(),
        }
    }
}
