use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use domain::{DeviceDirectory, DeviceRecord, DirectoryError};
use tracing::debug;

/// In-memory device directory and state store. Lookups hand out
/// snapshots; the live record is only touched through
/// `compare_and_swap`, which holds the write lock across both the
/// comparison and the transition.
pub struct MemoryDeviceDirectory {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl MemoryDeviceDirectory {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    pub fn seeded(records: Vec<DeviceRecord>) -> Self {
        let directory = Self::new();
        for record in records {
            directory.insert(record);
        }
        directory
    }

    pub fn insert(&self, record: DeviceRecord) {
        self.devices
            .write()
            .expect("device map lock poisoned")
            .insert(record.id.clone(), record);
    }

    /// Atomically replace the device's state token, but only while it
    /// still equals `expected`. Returns `Ok(false)` on a token
    /// conflict (a concurrent command won the race).
    pub fn compare_and_swap(
        &self,
        device_id: &str,
        expected: Option<&str>,
        next: Option<String>,
    ) -> Result<bool, DirectoryError> {
        let mut devices = self.devices.write().expect("device map lock poisoned");

        let record = devices
            .get_mut(device_id)
            .ok_or_else(|| DirectoryError(format!("unknown device: {device_id}")))?;

        if record.state_token.as_deref() != expected {
            debug!(
                device = %device_id,
                current = ?record.state_token,
                expected = ?expected,
                "State token conflict"
            );
            return Ok(false);
        }

        record.state_token = next;
        Ok(true)
    }
}

impl Default for MemoryDeviceDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceDirectory for MemoryDeviceDirectory {
    async fn get(&self, device_id: &str) -> Result<Option<DeviceRecord>, DirectoryError> {
        Ok(self
            .devices
            .read()
            .expect("device map lock poisoned")
            .get(device_id)
            .cloned())
    }
}
