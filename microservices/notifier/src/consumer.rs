//! Event consumer
//!
//! Bridges the channel to the mailer. One event's failure is independent of
//! the rest: delivery errors are logged and the cursor advances regardless.

use async_trait::async_trait;
use certhub_events::{EventHandler, EventKind, NotificationEvent};
use tracing::{debug, error, info};

use crate::mailer::MailSender;

pub struct NotificationConsumer<M> {
    mailer: M,
}

impl<M: MailSender> NotificationConsumer<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl<M: MailSender> EventHandler for NotificationConsumer<M> {
    async fn handle(&self, event: NotificationEvent) {
        match event.kind {
            EventKind::RecordCreated => {
                let record = &event.record_snapshot;
                info!(record_id = %record.id, "certificate created event received");
                if let Err(err) = self.mailer.send_certificate_created(record).await {
                    error!(
                        record_id = %record.id,
                        error = %err,
                        "notification email failed, event will not be retried"
                    );
                }
            }
            EventKind::Unknown => {
                debug!("ignoring event of unknown kind");
            }
        }
    }
}
