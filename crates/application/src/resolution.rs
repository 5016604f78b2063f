use std::sync::Arc;

use domain::{ControlMessage, DeviceContext, DeviceDirectory, ResolutionError};
use tracing::debug;

/// Maps message addressing (`device`, optional `parent`, claimed
/// `owner`) onto directory snapshots.
///
/// A command may act only on devices owned by the principal the message
/// claims; a dangling parent reference is a failure, not a no-op.
pub struct DeviceResolver {
    directory: Arc<dyn DeviceDirectory>,
}

impl DeviceResolver {
    pub fn new(directory: Arc<dyn DeviceDirectory>) -> Self {
        Self { directory }
    }

    pub async fn resolve(&self, message: &ControlMessage) -> Result<DeviceContext, ResolutionError> {
        let device = self
            .lookup(&message.device)
            .await?
            .ok_or_else(|| ResolutionError::UnknownDevice(message.device.clone()))?;

        if device.owner != message.owner {
            return Err(ResolutionError::OwnerMismatch {
                expected: device.owner,
                claimed: message.owner.clone(),
            });
        }

        let parent = match &message.parent {
            None => None,
            Some(parent_id) => Some(
                self.lookup(parent_id)
                    .await?
                    .ok_or_else(|| ResolutionError::UnknownDevice(parent_id.clone()))?,
            ),
        };

        debug!(device = %device.id, parent = ?parent.as_ref().map(|p| &p.id), "Resolved device context");

        Ok(DeviceContext { device, parent })
    }

    async fn lookup(
        &self,
        device_id: &str,
    ) -> Result<Option<domain::DeviceRecord>, ResolutionError> {
        self.directory
            .get(device_id)
            .await
            .map_err(|e| ResolutionError::DirectoryUnavailable(e.to_string()))
    }
}
