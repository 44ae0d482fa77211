//! Error types for the task store

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in store and log operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization to or from JSON failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested task does not exist
    #[error("Task {0} not found")]
    TaskNotFound(String),

    /// A change set produced a document that no longer fits the task schema
    #[error("Invalid change set: {0}")]
    InvalidChange(String),
}

impl StoreError {
    /// Whether this error is the not-found case (a business outcome, not a fault)
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::TaskNotFound(_))
    }
}
