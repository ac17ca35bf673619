//! Notification event payload

use certhub_core::domain::CertificateRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stream entry field carrying the JSON payload.
pub(crate) const PAYLOAD_FIELD: &str = "payload";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RecordCreated,
    /// Kinds this consumer does not know about; skipped, never an error.
    #[serde(other)]
    Unknown,
}

/// Ephemeral message carried on the channel: an event tag plus a snapshot
/// of the record at the moment of creation. Ownership passes from publisher
/// to channel to subscriber; nothing holds it after consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: EventKind,
    pub record_snapshot: CertificateRecord,
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn record_created(record: CertificateRecord) -> Self {
        Self {
            kind: EventKind::RecordCreated,
            record_snapshot: record,
            timestamp: Utc::now(),
        }
    }
}
