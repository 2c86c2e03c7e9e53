//! # Store Interface
//!
//! The read/write interface the engine is written against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DocumentStore                                                          │
//! │  ├── get_by_id(collection, id)            → Option<Document>           │
//! │  ├── query_by_field(collection, f, v)     → Vec<Document>              │
//! │  ├── list_all(collection)                 → Vec<Document>              │
//! │  ├── create(collection, data)             → generated id               │
//! │  ├── set(collection, id, data)            → upsert                     │
//! │  ├── update(collection, id, partial)      → shallow merge              │
//! │  ├── delete(collection, id)               → absent is fine             │
//! │  └── commit(WriteBatch)                   → all-or-nothing             │
//! │                                                                         │
//! │  Implementations: MemoryStore (tests), SqliteStore (persistent)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementors provide the three reads and `commit`; the single-document
//! writes are one-op batches.

use async_trait::async_trait;
use serde_json::Value;

use crate::batch::WriteBatch;
use crate::document::Document;
use crate::error::StoreResult;

/// Generates a fresh document id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document, `None` if absent.
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// All documents whose top-level `field` equals `value`, ordered by id.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>>;

    /// Every document in a collection, ordered by id.
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Applies a batch atomically.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;

    /// Inserts under a generated id and returns it.
    async fn create(&self, collection: &str, data: Value) -> StoreResult<String> {
        let id = generate_id();
        self.commit(WriteBatch::new().create(collection, &id, data))
            .await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> StoreResult<()> {
        self.commit(WriteBatch::new().set(collection, id, data)).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        self.commit(WriteBatch::new().update(collection, id, patch))
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.commit(WriteBatch::new().delete(collection, id)).await
    }
}
