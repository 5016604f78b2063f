use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::{DeviceContext, DeviceRecord};
use crate::error::DispatchError;
use crate::message::ControlMessage;

/// The handoff envelope produced by a fully validated exchange: the
/// typed message plus the directory snapshots it was resolved against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatedCommand {
    pub message: ControlMessage,
    pub device: DeviceRecord,
    pub parent: Option<DeviceRecord>,
    pub received_at: DateTime<Utc>,
}

impl ValidatedCommand {
    pub fn new(message: ControlMessage, context: DeviceContext) -> Self {
        Self {
            message,
            device: context.device,
            parent: context.parent,
            received_at: Utc::now(),
        }
    }
}

/// Produced capability: the device-command dispatcher sitting behind
/// the exchange. Whether dispatch is fire-and-forget or acknowledged is
/// the dispatcher's decision, not the exchange's.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    async fn dispatch(&self, command: ValidatedCommand) -> Result<(), DispatchError>;
}
