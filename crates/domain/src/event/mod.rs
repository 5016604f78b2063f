use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod publisher;
pub use publisher::EventPublisher;

use crate::message::ControlAction;

/// Application events emitted by the control exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GatewayEvent {
    /// A message passed all stages and was handed to the dispatcher
    CommandDispatched {
        message_id: String,
        device: String,
        control: ControlAction,
        timestamp: DateTime<Utc>,
    },

    /// A message was rejected at some stage of the pipeline
    CommandRejected {
        /// Message id when the payload got far enough to carry one
        message_id: Option<String>,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// The dispatcher refused or failed the handoff
    DispatchFailed {
        message_id: String,
        device: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl GatewayEvent {
    /// Create a CommandDispatched event
    pub fn command_dispatched(
        message_id: impl Into<String>,
        device: impl Into<String>,
        control: ControlAction,
    ) -> Self {
        Self::CommandDispatched {
            message_id: message_id.into(),
            device: device.into(),
            control,
            timestamp: Utc::now(),
        }
    }

    /// Create a CommandRejected event
    pub fn command_rejected(message_id: Option<String>, reason: impl Into<String>) -> Self {
        Self::CommandRejected {
            message_id,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a DispatchFailed event
    pub fn dispatch_failed(
        message_id: impl Into<String>,
        device: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::DispatchFailed {
            message_id: message_id.into(),
            device: device.into(),
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    /// Get the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::CommandDispatched { timestamp, .. } => *timestamp,
            Self::CommandRejected { timestamp, .. } => *timestamp,
            Self::DispatchFailed { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &str {
        match self {
            Self::CommandDispatched { .. } => "CommandDispatched",
            Self::CommandRejected { .. } => "CommandRejected",
            Self::DispatchFailed { .. } => "DispatchFailed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_dispatched_event() {
        let event = GatewayEvent::command_dispatched("a1", "dev-1", ControlAction::Reset);

        assert_eq!(event.event_type(), "CommandDispatched");
        match event {
            GatewayEvent::CommandDispatched {
                message_id,
                device,
                control,
                ..
            } => {
                assert_eq!(message_id, "a1");
                assert_eq!(device, "dev-1");
                assert_eq!(control, ControlAction::Reset);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_command_rejected_without_message_id() {
        let event = GatewayEvent::command_rejected(None, "Missing required field: owner");

        assert_eq!(event.event_type(), "CommandRejected");
        match event {
            GatewayEvent::CommandRejected {
                message_id, reason, ..
            } => {
                assert_eq!(message_id, None);
                assert!(reason.contains("owner"));
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = GatewayEvent::command_dispatched("a1", "dev-1", ControlAction::FactoryReset);

        let json_str = serde_json::to_string(&event).unwrap();
        let deserialized: GatewayEvent = serde_json::from_str(&json_str).unwrap();

        assert_eq!(deserialized.event_type(), "CommandDispatched");
        assert!(json_str.contains("factory-reset"));
    }
}
