//! Event subscriber

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::streams::{StreamId, StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;
use tracing::{info, warn};

use crate::event::PAYLOAD_FIELD;
use crate::{NotificationEvent, Result};

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub broker_url: String,
    pub topic: String,
    pub group: String,
    pub consumer: String,
    pub block_ms: usize,
    pub batch_size: usize,
}

/// Consumes one batch entry at a time; failures are the handler's problem,
/// the subscriber advances past every delivered event regardless.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: NotificationEvent);
}

/// Long-lived consumer attached to the stream through a consumer group.
///
/// The group is created at offset 0, so the first attach replays the topic
/// from the earliest retained entry; afterwards the group cursor is durable
/// across restarts.
pub struct EventSubscriber {
    conn: MultiplexedConnection,
    config: SubscriberConfig,
}

impl EventSubscriber {
    pub async fn connect(config: SubscriberConfig) -> Result<Self> {
        let client = redis::Client::open(config.broker_url.as_str())?;
        let mut conn = client.get_multiplexed_async_connection().await?;

        let created: std::result::Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&config.topic)
            .arg(&config.group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;
        match created {
            Ok(()) => info!(topic = %config.topic, group = %config.group, "consumer group created"),
            // The group already existing is the normal case after restart.
            Err(err) if err.code() == Some("BUSYGROUP") => {}
            Err(err) => return Err(err.into()),
        }

        Ok(Self { conn, config })
    }

    /// Read-dispatch-acknowledge loop. Returns only on a broker error; the
    /// caller decides whether to reconnect.
    pub async fn run<H: EventHandler>(&mut self, handler: &H) -> Result<()> {
        let options = StreamReadOptions::default()
            .group(&self.config.group, &self.config.consumer)
            .count(self.config.batch_size)
            .block(self.config.block_ms);

        info!(
            topic = %self.config.topic,
            group = %self.config.group,
            consumer = %self.config.consumer,
            "subscriber attached"
        );

        loop {
            let reply: StreamReadReply = self
                .conn
                .xread_options(&[self.config.topic.as_str()], &[">"], &options)
                .await?;

            for key in reply.keys {
                for entry in key.ids {
                    dispatch(handler, &entry).await;
                    // Acknowledged unconditionally: effects are at-most-once.
                    let _: i64 = self
                        .conn
                        .xack(
                            &self.config.topic,
                            &self.config.group,
                            &[entry.id.as_str()],
                        )
                        .await?;
                }
            }
        }
    }
}

async fn dispatch<H: EventHandler>(handler: &H, entry: &StreamId) {
    let Some(value) = entry.map.get(PAYLOAD_FIELD) else {
        warn!(entry_id = %entry.id, "stream entry without payload field, skipping");
        return;
    };
    let raw: String = match redis::from_redis_value(value) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(entry_id = %entry.id, error = %err, "unreadable stream entry, skipping");
            return;
        }
    };
    match serde_json::from_str::<NotificationEvent>(&raw) {
        Ok(event) => handler.handle(event).await,
        Err(err) => {
            warn!(entry_id = %entry.id, error = %err, "undecodable event payload, skipping");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certhub_core::domain::CertificateRecord;
    use chrono::Utc;
    use redis::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<NotificationEvent>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: NotificationEvent) {
            self.seen.lock().unwrap().push(event);
        }
    }

    fn entry(map: HashMap<String, Value>) -> StreamId {
        StreamId {
            id: "1693577426000-0".to_string(),
            map,
        }
    }

    fn valid_payload() -> String {
        let record = CertificateRecord {
            id: "0123456789abcdef01234567".into(),
            name: "AWS SA".into(),
            issuing_organization: "Amazon".into(),
            date_obtained: "2024-01-01T00:00:00+00:00".into(),
            date_expiration: None,
            skills: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        serde_json::to_string(&NotificationEvent::record_created(record)).unwrap()
    }

    #[tokio::test]
    async fn well_formed_entries_reach_the_handler() {
        let handler = RecordingHandler::default();
        let map = HashMap::from([(
            PAYLOAD_FIELD.to_string(),
            Value::BulkString(valid_payload().into_bytes()),
        )]);

        dispatch(&handler, &entry(map)).await;

        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].record_snapshot.name, "AWS SA");
    }

    #[tokio::test]
    async fn entry_without_payload_field_is_skipped() {
        let handler = RecordingHandler::default();
        let map = HashMap::from([("unrelated".to_string(), Value::BulkString(b"x".to_vec()))]);

        dispatch(&handler, &entry(map)).await;

        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_string_payload_is_skipped() {
        let handler = RecordingHandler::default();
        let map = HashMap::from([(PAYLOAD_FIELD.to_string(), Value::Array(vec![]))]);

        dispatch(&handler, &entry(map)).await;

        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn undecodable_payload_is_skipped() {
        let handler = RecordingHandler::default();
        let map = HashMap::from([(
            PAYLOAD_FIELD.to_string(),
            Value::BulkString(b"{not valid json".to_vec()),
        )]);

        dispatch(&handler, &entry(map)).await;

        assert!(handler.seen.lock().unwrap().is_empty());
    }
}
