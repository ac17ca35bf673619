//! JSONB document store over the PostgreSQL wire protocol
//!
//! One table per collection: `(seq BIGSERIAL, id TEXT UNIQUE, doc JSONB)`.
//! `seq` preserves insertion order for searches; partial updates use the
//! server-side `doc || patch` merge, which is atomic per document.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{DocumentStore, PoolConfig, Result, StoreError, StorePool};

pub struct PgDocStore {
    pool: StorePool,
}

impl PgDocStore {
    pub fn new(pool: StorePool) -> Self {
        Self { pool }
    }

    /// Build a pool and verify connectivity with a round trip.
    pub async fn connect(config: PoolConfig) -> Result<Self> {
        let pool = StorePool::new(config)?;
        let conn = pool.get().await?;
        conn.simple_query("SELECT 1")
            .await
            .map_err(StoreError::Query)?;
        debug!("connected to document store");
        Ok(Self { pool })
    }

    /// Create the backing table for a collection if it does not exist.
    pub async fn ensure_collection(&self, collection: &str) -> Result<()> {
        check_collection_name(collection)?;
        let conn = self.pool.get().await?;
        conn.batch_execute(&format!(
            "CREATE TABLE IF NOT EXISTS {collection} (
                seq BIGSERIAL PRIMARY KEY,
                id  TEXT NOT NULL UNIQUE,
                doc JSONB NOT NULL
            )"
        ))
        .await
        .map_err(StoreError::Query)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocStore {
    #[instrument(skip(self, doc))]
    async fn insert(&self, collection: &str, id: &str, doc: Value) -> Result<()> {
        check_collection_name(collection)?;
        let conn = self.pool.get().await?;
        conn.execute(
            &format!("INSERT INTO {collection} (id, doc) VALUES ($1, $2)"),
            &[&id, &doc],
        )
        .await
        .map_err(StoreError::Query)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        check_collection_name(collection)?;
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                &format!("SELECT doc FROM {collection} WHERE id = $1"),
                &[&id],
            )
            .await
            .map_err(StoreError::Query)?;
        Ok(row.map(|r| r.get(0)))
    }

    #[instrument(skip(self))]
    async fn search(&self, collection: &str, fields: &[&str], query: &str) -> Result<Vec<Value>> {
        check_collection_name(collection)?;
        let conn = self.pool.get().await?;

        let rows = if query.is_empty() {
            conn.query(
                &format!("SELECT doc FROM {collection} ORDER BY seq"),
                &[],
            )
            .await
            .map_err(StoreError::Query)?
        } else {
            let clauses: Vec<String> = fields
                .iter()
                .map(|field| format!("doc->>'{field}' ILIKE $1"))
                .collect();
            let pattern = like_pattern(query);
            conn.query(
                &format!(
                    "SELECT doc FROM {collection} WHERE {} ORDER BY seq",
                    clauses.join(" OR ")
                ),
                &[&pattern],
            )
            .await
            .map_err(StoreError::Query)?
        };

        Ok(rows.into_iter().map(|r| r.get(0)).collect())
    }

    #[instrument(skip(self, patch))]
    async fn merge(&self, collection: &str, id: &str, patch: Value) -> Result<Option<Value>> {
        check_collection_name(collection)?;
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                &format!("UPDATE {collection} SET doc = doc || $2 WHERE id = $1 RETURNING doc"),
                &[&id, &patch],
            )
            .await
            .map_err(StoreError::Query)?;
        Ok(row.map(|r| r.get(0)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        check_collection_name(collection)?;
        let conn = self.pool.get().await?;
        let count = conn
            .execute(&format!("DELETE FROM {collection} WHERE id = $1"), &[&id])
            .await
            .map_err(StoreError::Query)?;
        Ok(count > 0)
    }

    async fn is_healthy(&self) -> bool {
        self.pool.is_healthy().await
    }
}

// Collection names are interpolated into SQL, so they are restricted to
// lowercase identifiers even though they only ever come from constants.
fn check_collection_name(collection: &str) -> Result<()> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Configuration(format!(
            "invalid collection name: {collection:?}"
        )))
    }
}

// Escape LIKE metacharacters so the query is a literal substring match.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
