//! Document store access for certhub services
//!
//! Records are persisted as JSON documents keyed by an opaque identifier.
//! `DocumentStore` is the seam between the record services and the backing
//! store; the production backend speaks the PostgreSQL wire protocol with
//! JSONB documents, and an in-memory backend serves tests and local runs.

mod error;
mod memory;
mod pool;
mod postgres;

use async_trait::async_trait;
use serde_json::Value;

pub use error::{Result, StoreError};
pub use memory::MemoryDocStore;
pub use pool::{PoolConfig, StorePool};
pub use postgres::PgDocStore;

/// Collection-level CRUD over JSON documents.
///
/// `collection` names come from compile-time constants in the record
/// services, never from request input.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<()>;

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Case-insensitive substring match over the given document fields.
    /// An empty query matches every document. Results come back in
    /// insertion order (store-natural order).
    async fn search(&self, collection: &str, fields: &[&str], query: &str) -> Result<Vec<Value>>;

    /// Atomically merge `patch` into the document's top-level keys.
    /// Returns the post-merge document, or `None` when no document matched.
    async fn merge(&self, collection: &str, id: &str, patch: Value) -> Result<Option<Value>>;

    /// Returns true when a document was removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    async fn is_healthy(&self) -> bool;
}
