//! Event publisher

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::event::PAYLOAD_FIELD;
use crate::{EventSink, NotificationEvent, Result};

/// Appends events to a named stream topic.
///
/// The connection is established per publish, so a broker outage at startup
/// does not prevent the owning service from running; the failure surfaces
/// on the publish attempt instead.
pub struct EventPublisher {
    client: redis::Client,
    topic: String,
}

impl EventPublisher {
    pub fn new(broker_url: &str, topic: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(broker_url)?;
        Ok(Self {
            client,
            topic: topic.into(),
        })
    }
}

#[async_trait]
impl EventSink for EventPublisher {
    async fn publish(&self, event: &NotificationEvent) -> Result<()> {
        let payload = serde_json::to_string(event)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let entry_id: String = conn
            .xadd(&self.topic, "*", &[(PAYLOAD_FIELD, payload.as_str())])
            .await?;
        debug!(topic = %self.topic, entry_id = %entry_id, "notification event published");
        Ok(())
    }
}
