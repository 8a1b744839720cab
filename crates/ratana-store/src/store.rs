//! The `DocumentStore` trait.

use crate::{Document, Fields, Filter, StoreError};
use async_trait::async_trait;

/// Collection/document CRUD over the hosted document database.
///
/// This is a consumed collaborator: the storefront core is written against
/// this trait and never owns storage itself. Reads are idempotent; an update
/// merges the given fields over the stored ones, and each written field
/// value replaces the old one wholesale (no partial patch within a field,
/// so array fields are always full replacements).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// List documents matching all of the given filters.
    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError>;

    /// Create a document with the given id and fields.
    async fn create(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError>;

    /// Update a document, merging the given fields over the stored ones.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError>;
}

/// Generate a unique document id using a timestamp and an atomic counter.
pub fn unique_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{:x}{:04x}", timestamp as u64, counter & 0xffff)
}
