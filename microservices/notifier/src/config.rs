//! Notifier configuration

use certhub_core::config::{env_or, env_parsed, required_in, AppEnv};
use certhub_core::Result;
use certhub_events::SubscriberConfig;

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub broker_url: String,
    pub event_topic: String,
    pub consumer_group: String,
    pub consumer_name: String,
    /// Outbound email HTTP API
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,
    pub email_to: String,
    pub email_timeout_ms: u64,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self> {
        let app_env = AppEnv::from_env();

        Ok(Self {
            broker_url: required_in(app_env, "BROKER_URL", "redis://localhost:6379")?,
            event_topic: env_or("EVENT_TOPIC", "certification-events"),
            consumer_group: env_or("CONSUMER_GROUP", "certification-notifier"),
            consumer_name: env_or("CONSUMER_NAME", "notifier-1"),
            email_api_url: env_or("EMAIL_API_URL", "http://localhost:8025/api/send"),
            email_api_key: env_or("EMAIL_API_KEY", ""),
            email_from: env_or("EMAIL_FROM", "noreply@certhub.local"),
            email_to: env_or("EMAIL_TO", "admin@certhub.local"),
            email_timeout_ms: env_parsed("EMAIL_TIMEOUT_MS", 10_000),
        })
    }

    pub fn subscriber(&self) -> SubscriberConfig {
        SubscriberConfig {
            broker_url: self.broker_url.clone(),
            topic: self.event_topic.clone(),
            group: self.consumer_group.clone(),
            consumer: self.consumer_name.clone(),
            block_ms: 5_000,
            batch_size: 10,
        }
    }
}
