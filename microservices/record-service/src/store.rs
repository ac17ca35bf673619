//! Record store adapter
//!
//! The sole point of contact between record operations and the document
//! store. Identifier validation happens before any store access; every
//! store call carries a caller-side deadline.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use certhub_core::domain::RecordId;
use certhub_core::{CerthubError, Result};
use certhub_store::DocumentStore;
use chrono::Utc;
use serde_json::Value;
use tracing::error;

use crate::entity::Entity;

pub struct RecordStore<E: Entity> {
    store: Arc<dyn DocumentStore>,
    op_timeout: Duration,
    _entity: PhantomData<E>,
}

impl<E: Entity> Clone for RecordStore<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            op_timeout: self.op_timeout,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> RecordStore<E> {
    pub fn new(store: Arc<dyn DocumentStore>, op_timeout: Duration) -> Self {
        Self {
            store,
            op_timeout,
            _entity: PhantomData,
        }
    }

    pub async fn find_by_id(&self, raw_id: &str) -> Result<E> {
        let id = RecordId::parse(raw_id)?;
        let doc = self
            .guarded("find_by_id", self.store.find_by_id(E::COLLECTION, id.as_str()))
            .await?;
        match doc {
            Some(doc) => decode::<E>(doc),
            None => Err(not_found::<E>(&id)),
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<E>> {
        let docs = self
            .guarded(
                "search",
                self.store.search(E::COLLECTION, E::SEARCH_FIELDS, query.trim()),
            )
            .await?;
        docs.into_iter().map(decode::<E>).collect()
    }

    pub async fn create(&self, draft: E::Draft) -> Result<E> {
        let id = RecordId::generate();
        let record = E::from_draft(&id, draft, Utc::now());
        let doc = encode(&record)?;
        self.guarded("insert", self.store.insert(E::COLLECTION, id.as_str(), doc))
            .await?;
        Ok(record)
    }

    pub async fn update(&self, raw_id: &str, patch: E::Patch) -> Result<E> {
        let id = RecordId::parse(raw_id)?;
        let mut patch_doc = encode(&patch)?;
        if let Some(fields) = patch_doc.as_object_mut() {
            // updated_at advances on every update, even an empty patch.
            fields.insert("updated_at".to_string(), encode(&Utc::now())?);
        }
        let merged = self
            .guarded("merge", self.store.merge(E::COLLECTION, id.as_str(), patch_doc))
            .await?;
        match merged {
            Some(doc) => decode::<E>(doc),
            None => Err(not_found::<E>(&id)),
        }
    }

    pub async fn delete(&self, raw_id: &str) -> Result<bool> {
        let id = RecordId::parse(raw_id)?;
        let deleted = self
            .guarded("delete", self.store.delete(E::COLLECTION, id.as_str()))
            .await?;
        if deleted {
            Ok(true)
        } else {
            Err(not_found::<E>(&id))
        }
    }

    async fn guarded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = certhub_store::Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                error!(entity = E::KIND, op, error = %err, "store operation failed");
                Err(CerthubError::Store(err.to_string()))
            }
            Err(_) => {
                error!(
                    entity = E::KIND,
                    op,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "store operation timed out"
                );
                Err(CerthubError::Timeout(format!("store {op} timed out")))
            }
        }
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| CerthubError::Internal(err.to_string()))
}

fn decode<E: Entity>(doc: Value) -> Result<E> {
    serde_json::from_value(doc)
        .map_err(|err| CerthubError::Store(format!("corrupt {} document: {err}", E::KIND)))
}

fn not_found<E: Entity>(id: &RecordId) -> CerthubError {
    CerthubError::NotFound(format!("{} {id} not found", E::KIND))
}
