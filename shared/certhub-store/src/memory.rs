//! In-memory document store backend
//!
//! Mirrors the semantics of the JSONB backend (insertion order, shallow
//! top-level merge) for tests and local runs without a database.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::{DocumentStore, Result};

#[derive(Default)]
pub struct MemoryDocStore {
    collections: DashMap<String, Vec<(String, Value)>>,
}

impl MemoryDocStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocStore {
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push((id.to_string(), doc));
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, doc)| doc.clone())
        }))
    }

    async fn search(&self, collection: &str, fields: &[&str], query: &str) -> Result<Vec<Value>> {
        let needle = query.to_lowercase();
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| query.is_empty() || matches_any(doc, fields, &needle))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn merge(&self, collection: &str, id: &str, patch: Value) -> Result<Option<Value>> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some((_, doc)) = docs.iter_mut().find(|(doc_id, _)| doc_id == id) else {
            return Ok(None);
        };
        merge_top_level(doc, &patch);
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        Ok(docs.len() < before)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

fn matches_any(doc: &Value, fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|field| {
        doc.get(field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

// Same shape as the JSONB `||` operator: top-level keys only.
fn merge_top_level(doc: &mut Value, patch: &Value) {
    if let (Some(base), Some(overlay)) = (doc.as_object_mut(), patch.as_object()) {
        for (key, value) in overlay {
            base.insert(key.clone(), value.clone());
        }
    }
}
