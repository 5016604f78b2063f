use async_trait::async_trait;

use super::DeviceRecord;
use crate::error::DirectoryError;

/// Consumed capability: lookup into the externally owned device
/// directory. Returned records are snapshots; concurrent validations
/// must never observe mutation through them.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn get(&self, device_id: &str) -> Result<Option<DeviceRecord>, DirectoryError>;
}

/// Resolved addressing context for one message: the target device plus
/// its parent snapshot when the message carries a parent edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContext {
    pub device: DeviceRecord,
    pub parent: Option<DeviceRecord>,
}

impl DeviceContext {
    /// State token the precondition guard compares against.
    pub fn state_token(&self) -> Option<&str> {
        self.device.state_token.as_deref()
    }
}
