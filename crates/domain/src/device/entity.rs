use serde::{Deserialize, Serialize};

/// Directory snapshot of a known device. Read-only to the exchange;
/// the directory and state store are owned elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    pub id: String,
    /// Owning principal (uuid v4 text)
    pub owner: String,
    /// Immediate parent device, if any
    pub parent: Option<String>,
    /// Current observed state token, compared against `expected`
    pub state_token: Option<String>,
    pub enabled: bool,
}

impl DeviceRecord {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        parent: Option<String>,
        state_token: Option<String>,
        enabled: bool,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            parent,
            state_token,
            enabled,
        }
    }
}
