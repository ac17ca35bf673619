//! Error types for Certhub services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CerthubError>;

/// Platform-wide error taxonomy.
///
/// `Validation` and `NotFound` are expected outcomes reported precisely to
/// callers; the remaining kinds are degraded to a generic message at the
/// client boundary, with detail kept in server-side logs.
#[derive(Error, Debug)]
pub enum CerthubError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("event channel error: {0}")]
    Channel(String),

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CerthubError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Unavailable(_) => 503,
            Self::Timeout(_) => 504,
            _ => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
            Self::Channel(_) => "CHANNEL_ERROR",
            Self::Delivery(_) => "DELIVERY_ERROR",
            Self::Unavailable(_) => "UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to a client. Server-side kinds are collapsed
    /// to a generic message so internal detail stays in the logs.
    pub fn client_message(&self) -> String {
        if self.status_code() >= 500 {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<std::io::Error> for CerthubError {
    fn from(err: std::io::Error) -> Self {
        CerthubError::Internal(err.to_string())
    }
}
