use async_trait::async_trait;
use domain::{CommandDispatcher, DispatchError, ValidatedCommand};
use tokio::sync::mpsc;

/// Hands validated commands to the downstream dispatch layer over a
/// bounded channel. Acknowledgment is the consumer's business; this
/// adapter only fails when the consumer is gone.
pub struct ChannelCommandDispatcher {
    tx: mpsc::Sender<ValidatedCommand>,
}

impl ChannelCommandDispatcher {
    pub fn new(tx: mpsc::Sender<ValidatedCommand>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl CommandDispatcher for ChannelCommandDispatcher {
    async fn dispatch(&self, command: ValidatedCommand) -> Result<(), DispatchError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| DispatchError("command channel closed".to_string()))
    }
}
