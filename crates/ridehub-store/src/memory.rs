//! # In-Memory Store
//!
//! A [`DocumentStore`] over plain maps, used by tests and the demo paths.
//!
//! A batch is staged against copies of the collections it touches and
//! swapped in under one write lock, so readers never observe a partial
//! batch. [`MemoryStore::set_available`] simulates an outage: every call
//! then fails with [`StoreError::Unavailable`].

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::batch::{WriteBatch, WriteOp};
use crate::document::{
    ensure_object, field_matches, field_state_matches, merge_shallow, validate_field_name,
    Document,
};
use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;

type Collection = BTreeMap<String, Value>;

#[derive(Debug)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Switches the simulated outage off (`false`) or back on (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }
}

fn apply(collection: &str, docs: &mut Collection, op: &WriteOp) -> StoreResult<()> {
    match op {
        WriteOp::Create { id, data, .. } => {
            ensure_object(data)?;
            if docs.contains_key(id) {
                return Err(StoreError::conflict(collection, id.as_str()));
            }
            docs.insert(id.clone(), data.clone());
        }
        WriteOp::Set { id, data, .. } => {
            ensure_object(data)?;
            docs.insert(id.clone(), data.clone());
        }
        WriteOp::Update { id, patch, .. } => {
            let current = docs
                .get_mut(id)
                .ok_or_else(|| StoreError::not_found(collection, id.as_str()))?;
            merge_shallow(current, patch)?;
        }
        WriteOp::Delete { id, .. } => {
            docs.remove(id);
        }
        WriteOp::Expect {
            id, field, value, ..
        } => {
            validate_field_name(field)?;
            let current = docs
                .get(id)
                .ok_or_else(|| StoreError::not_found(collection, id.as_str()))?;
            if !field_state_matches(current, field, value.as_ref()) {
                return Err(StoreError::PreconditionFailed {
                    collection: collection.to_string(),
                    id: id.clone(),
                    field: field.clone(),
                });
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.check_available()?;
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        validate_field_name(field)?;
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| field_matches(data, field, value))
                    .map(|(id, data)| Document::new(id.as_str(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.as_str(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        self.check_available()?;
        debug!(ops = batch.len(), "Committing batch (memory)");

        let mut guard = self.collections.write().await;
        let mut staged: HashMap<String, Collection> = HashMap::new();

        for op in batch.ops() {
            let name = op.collection();
            let docs = staged
                .entry(name.to_string())
                .or_insert_with(|| guard.get(name).cloned().unwrap_or_default());
            apply(name, docs, op)?;
        }

        guard.extend(staged);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let id = store.create("vehicles", json!({"name": "Click"})).await.unwrap();

        let doc = store.get_by_id("vehicles", &id).await.unwrap().unwrap();
        assert_eq!(doc.field("name"), Some(&json!("Click")));
        assert!(store.get_by_id("vehicles", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_by_field() {
        let store = MemoryStore::new();
        store.set("ratings", "r1", json!({"target_id": "v1", "score": 5})).await.unwrap();
        store.set("ratings", "r2", json!({"target_id": "v2", "score": 3})).await.unwrap();
        store.set("ratings", "r3", json!({"target_id": "v1", "score": 4})).await.unwrap();

        let docs = store.query_by_field("ratings", "target_id", &json!("v1")).await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3"]);

        assert!(store.query_by_field("ratings", "bad.field", &json!(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_existing() {
        let store = MemoryStore::new();
        store.set("bookings", "b1", json!({"status": "Pending", "rated": false})).await.unwrap();
        store.update("bookings", "b1", json!({"status": "On-Going"})).await.unwrap();

        let doc = store.get_by_id("bookings", "b1").await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"status": "On-Going", "rated": false}));

        let err = store.update("bookings", "missing", json!({"a": 1})).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let store = MemoryStore::new();
        store.delete("favorites", "nobody:nothing").await.unwrap();
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let store = MemoryStore::new();
        store.set("bookings", "b1", json!({"status": "Complete", "rated": true})).await.unwrap();

        let batch = WriteBatch::new()
            .create("ratings", "r1", json!({"score": 5}))
            .expect_field("bookings", "b1", "rated", false)
            .update("bookings", "b1", json!({"rated": true}));

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed { ref field, .. } if field == "rated"));
        assert_eq!(store.count("ratings").await, 0);
    }

    #[tokio::test]
    async fn test_expect_unchanged_absent_field() {
        let store = MemoryStore::new();
        store.set("bookings", "b1", json!({"status": "Complete"})).await.unwrap();
        let guarded = || {
            WriteBatch::new()
                .expect_unchanged("bookings", "b1", "rated", None)
                .update("bookings", "b1", json!({"rated": true}))
        };

        store.commit(guarded()).await.unwrap();
        let doc = store.get_by_id("bookings", "b1").await.unwrap().unwrap();
        assert_eq!(doc.field("rated"), Some(&json!(true)));

        // The field now exists, so the same guard fails.
        let err = store.commit(guarded()).await.unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed { ref field, .. } if field == "rated"));
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let store = MemoryStore::new();
        let batch = || WriteBatch::new().create("bookings", "b1", json!({}));
        store.commit(batch()).await.unwrap();
        assert!(matches!(
            store.commit(batch()).await.unwrap_err(),
            StoreError::Conflict { .. }
        ));
    }

    #[tokio::test]
    async fn test_outage() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(store.list_all("vehicles").await.unwrap_err().is_unavailable());
        assert!(store.set("vehicles", "v", json!({})).await.unwrap_err().is_unavailable());

        store.set_available(true);
        assert!(store.list_all("vehicles").await.unwrap().is_empty());
    }
}
