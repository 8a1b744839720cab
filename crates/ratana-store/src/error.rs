//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced document does not exist.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Network or service failure. Safe to retry for reads.
    #[error("Transient store error: {0}")]
    Transient(String),

    /// The write conflicts with existing state (e.g. duplicate id).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A document field could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether retrying the operation could succeed.
    ///
    /// Only read operations should be retried on this basis; a retried write
    /// without an idempotency key can duplicate state (e.g. a second order).
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }

    /// Whether this is a missing-document error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
