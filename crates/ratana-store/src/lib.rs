//! Document store collaborator surface for the Ratana storefront core.
//!
//! The storefront delegates all persistence to a hosted document database
//! (collection/document CRUD, no schema enforcement). This crate defines the
//! [`DocumentStore`] trait the domain code is written against, the
//! [`Document`] and [`Filter`] types that cross that boundary, and a
//! functional [`MemoryStore`] backend for tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use ratana_store::{DocumentStore, Filter, MemoryStore, fields};
//!
//! let store = MemoryStore::new();
//! store.create("pincodes", "pin-1", fields! {
//!     "pincode" => "560001",
//!     "isActive" => true,
//! }).await?;
//!
//! let hits = store
//!     .list("pincodes", &[Filter::equal("pincode", "560001")])
//!     .await?;
//! ```

mod document;
mod error;
mod memory;
mod retry;
mod store;

pub use document::{Document, Fields, Filter};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use retry::{with_retry, BackoffStrategy, RetryPolicy};
pub use store::{unique_id, DocumentStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        fields, unique_id, Document, DocumentStore, Fields, Filter, MemoryStore, RetryPolicy,
        StoreError,
    };
}

/// Build a document field map from `"name" => value` pairs.
///
/// Values can be anything `serde_json::Value` converts from.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Fields::new();
        $(map.insert($name.to_string(), ::serde_json::Value::from($value));)+
        map
    }};
}
