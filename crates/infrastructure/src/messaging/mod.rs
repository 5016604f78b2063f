use std::sync::Arc;

use async_trait::async_trait;
use domain::GatewayEvent;
use domain::event::EventPublisher;
use tokio::sync::mpsc;
use tracing::info;

/// Fans one event out to several publishers. A failing publisher is
/// logged and does not stop the others.
pub struct CompositeEventPublisher {
    publishers: Vec<Arc<dyn EventPublisher>>,
}

impl CompositeEventPublisher {
    pub fn new(publishers: Vec<Arc<dyn EventPublisher>>) -> Self {
        Self { publishers }
    }
}

#[async_trait]
impl EventPublisher for CompositeEventPublisher {
    async fn publish(
        &self,
        event: GatewayEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for publisher in &self.publishers {
            // GatewayEvent is Clone, each publisher gets its own copy
            if let Err(e) = publisher.publish(event.clone()).await {
                tracing::error!("Failed to publish event to one of the publishers: {}", e);
            }
        }
        Ok(())
    }
}

/// Emits events into the log stream.
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(
        &self,
        event: GatewayEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            event_type = %event.event_type(),
            payload = %serde_json::to_string(&event)?,
            "Exchange event"
        );
        Ok(())
    }
}

/// Forwards events over a channel, for consumers that want to observe
/// exchange outcomes programmatically.
pub struct ChannelEventPublisher {
    tx: mpsc::UnboundedSender<GatewayEvent>,
}

impl ChannelEventPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GatewayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(
        &self,
        event: GatewayEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.tx
            .send(event)
            .map_err(|_| "event channel closed".into())
    }
}
