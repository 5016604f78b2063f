use crate::GatewayEvent;
use async_trait::async_trait;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        event: GatewayEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
