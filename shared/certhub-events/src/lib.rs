//! Asynchronous notification channel
//!
//! Publisher and subscriber halves of the certification event stream.
//! Publishing is best-effort from the caller's perspective: the publisher
//! awaits the broker acknowledgment and surfaces failures, but callers log
//! and carry on rather than failing the triggering operation.

mod error;
mod event;
mod publisher;
mod subscriber;

use async_trait::async_trait;

pub use error::{ChannelError, Result};
pub use event::{EventKind, NotificationEvent};
pub use publisher::EventPublisher;
pub use subscriber::{EventHandler, EventSubscriber, SubscriberConfig};

/// Seam between record services and the channel, so publish behavior can be
/// substituted in tests.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &NotificationEvent) -> Result<()>;
}
