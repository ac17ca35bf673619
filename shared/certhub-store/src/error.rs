//! Store error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(#[from] tokio_postgres::Error),

    #[error("query error: {0}")]
    Query(tokio_postgres::Error),

    #[error("pool error: {0}")]
    Pool(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
