//! Notifier
//!
//! Long-lived subscriber on the certification event topic. For every
//! "record created" event it triggers the outbound email side effect.
//! Runs fully decoupled from request handling; its failures never block
//! or fail client-facing requests.

use std::sync::Arc;
use std::time::Duration;

use certhub_core::{CerthubService, MicroserviceRuntime, Result};
use certhub_events::EventSubscriber;
use tracing::{error, info};

mod config;
mod consumer;
mod mailer;

use config::NotifierConfig;
use consumer::NotificationConsumer;
use mailer::HttpMailer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notifier=debug".parse().unwrap()),
        )
        .json()
        .init();

    info!("starting notifier");

    let service = Arc::new(NotifierService::new()?);
    MicroserviceRuntime::run(service).await
}

pub struct NotifierService {
    config: NotifierConfig,
}

impl NotifierService {
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: NotifierConfig::from_env()?,
        })
    }
}

#[async_trait::async_trait]
impl CerthubService for NotifierService {
    fn service_id(&self) -> &'static str {
        "notifier"
    }

    async fn start(&self) -> Result<()> {
        let handler = NotificationConsumer::new(HttpMailer::new(&self.config)?);

        // Reattach after broker failures; the consumer group cursor makes
        // reconnection safe.
        loop {
            match EventSubscriber::connect(self.config.subscriber()).await {
                Ok(mut subscriber) => {
                    if let Err(err) = subscriber.run(&handler).await {
                        error!(error = %err, "subscriber loop failed");
                    }
                }
                Err(err) => {
                    error!(error = %err, "cannot attach to event channel");
                }
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("shutting down notifier");
        Ok(())
    }
}
