use serde::{Deserialize, Serialize};

use super::ControlAction;

/// A validated device-control command. Immutable once constructed; the
/// exchange consumes it exactly once and holds no message store.
///
/// Field notes from the wire contract:
/// - `parent` is required but nullable: the key must be present in the
///   payload even when `null`
/// - `expected` is optional: an absent key is equivalent to `null`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlMessage {
    /// Unique identifier of this command instance (uuid v4 text)
    pub id: String,
    /// Requested action, one of the closed control set
    pub control: ControlAction,
    /// Unique identifier of the target device across all services
    pub device: String,
    /// Owning principal of the target device (uuid v4 text)
    pub owner: String,
    /// Immediate parent device, when the target sits under one
    pub parent: Option<String>,
    /// Expected state token; `None` means no precondition is enforced
    #[serde(default)]
    pub expected: Option<String>,
}

impl ControlMessage {
    /// Serialize back to the wire shape. Round-trips through `validate`
    /// to an equal record.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "control": self.control.as_str(),
            "device": self.device,
            "owner": self.owner,
            "parent": self.parent,
            "expected": self.expected,
        })
    }
}
