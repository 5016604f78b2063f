use std::sync::Arc;

use domain::event::EventPublisher;
use domain::{
    CommandDispatcher, DeviceDirectory, DispatchError, GatewayEvent, RejectionReason,
    ValidatedCommand,
};
use tracing::{error, info, warn};

use crate::guard::PreconditionGuard;
use crate::resolution::DeviceResolver;
use crate::schema::SchemaRegistry;
use crate::validation::MessageValidator;

use super::InboundEnvelope;

/// Terminal result of one message. Exactly one per inbound payload;
/// nothing is retried here.
#[derive(Debug)]
pub enum ExchangeOutcome {
    /// All stages passed and the dispatcher accepted the handoff
    Dispatched(ValidatedCommand),
    /// Some stage rejected the message
    Rejected(RejectionReason),
    /// The message was valid but the dispatcher refused it
    Failed(DispatchError),
    /// Own-origin traffic, dropped without processing
    Skipped,
}

/// The schema-validated control-message exchange.
///
/// One-shot linear pipeline per message: validate against the resolved
/// contract, resolve the addressed device, check the optimistic
/// precondition, hand off to the dispatcher. Any stage short-circuits
/// with a single rejection reason.
pub struct ControlExchange {
    origin: String,
    registry: Arc<SchemaRegistry>,
    resolver: DeviceResolver,
    dispatcher: Arc<dyn CommandDispatcher>,
    events: Arc<dyn EventPublisher>,
}

impl ControlExchange {
    pub fn new(
        origin: impl Into<String>,
        registry: Arc<SchemaRegistry>,
        directory: Arc<dyn DeviceDirectory>,
        dispatcher: Arc<dyn CommandDispatcher>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            origin: origin.into(),
            registry,
            resolver: DeviceResolver::new(directory),
            dispatcher,
            events,
        }
    }

    /// Process raw transport bytes: parse the envelope, then run the
    /// pipeline.
    pub async fn handle_raw(&self, raw: &str) -> ExchangeOutcome {
        match InboundEnvelope::parse(raw) {
            Ok(envelope) => self.handle(envelope).await,
            Err(reason) => {
                warn!(error = %reason, "Received non-conforming exchange message");
                self.emit(GatewayEvent::command_rejected(None, reason.to_string()))
                    .await;
                ExchangeOutcome::Rejected(reason)
            }
        }
    }

    /// Run the full pipeline on a parsed envelope.
    pub async fn handle(&self, envelope: InboundEnvelope) -> ExchangeOutcome {
        if envelope.origin == self.origin {
            // Loop prevention: our own published messages come back
            // through the same exchange
            return ExchangeOutcome::Skipped;
        }

        let command = match self.run(&envelope).await {
            Ok(command) => command,
            Err(reason) => {
                let message_id = envelope
                    .data
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);

                warn!(
                    routing_key = %envelope.routing_key,
                    origin = %envelope.origin,
                    reason = %reason,
                    "Rejected control message"
                );
                self.emit(GatewayEvent::command_rejected(message_id, reason.to_string()))
                    .await;
                return ExchangeOutcome::Rejected(reason);
            }
        };

        match self.dispatcher.dispatch(command.clone()).await {
            Ok(()) => {
                info!(
                    message_id = %command.message.id,
                    device = %command.message.device,
                    control = %command.message.control,
                    "Dispatched control command"
                );
                self.emit(GatewayEvent::command_dispatched(
                    &command.message.id,
                    &command.message.device,
                    command.message.control,
                ))
                .await;
                ExchangeOutcome::Dispatched(command)
            }
            Err(e) => {
                error!(
                    message_id = %command.message.id,
                    device = %command.message.device,
                    error = %e,
                    "Dispatcher refused validated command"
                );
                self.emit(GatewayEvent::dispatch_failed(
                    &command.message.id,
                    &command.message.device,
                    e.to_string(),
                ))
                .await;
                ExchangeOutcome::Failed(e)
            }
        }
    }

    /// The four pipeline stages. Pure with respect to the device
    /// directory: reads only, no state writes.
    async fn run(&self, envelope: &InboundEnvelope) -> Result<ValidatedCommand, RejectionReason> {
        let schema = self.registry.resolve(&envelope.routing_key)?;
        let message = MessageValidator::new(schema).validate(&envelope.data)?;
        let context = self.resolver.resolve(&message).await?;
        PreconditionGuard::check(message.expected.as_deref(), context.state_token())?;

        Ok(ValidatedCommand::new(message, context))
    }

    async fn emit(&self, event: GatewayEvent) {
        if let Err(e) = self.events.publish(event).await {
            error!(error = %e, "Failed to publish exchange event");
        }
    }
}
