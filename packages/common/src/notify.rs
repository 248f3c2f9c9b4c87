use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::event::GenericEvent;

/// Delivery hook for contest notifications.
///
/// Implementations hand the event to whatever channel reaches people (mail,
/// push, a queue). The engine only decides *when* to notify.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, event: &GenericEvent) -> Result<()>;
}

/// Writes notifications to the log. Used when no delivery channel is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn dispatch(&self, event: &GenericEvent) -> Result<()> {
        info!(topic = %event.topic, payload = %event.payload, "Notification dispatched");
        Ok(())
    }
}
