use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Control action requested on a device. Closed set; the contract does
/// not allow extension at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlAction {
    Reset,
    Reconnect,
    FactoryReset,
}

impl ControlAction {
    pub const ALL: [ControlAction; 3] = [Self::Reset, Self::Reconnect, Self::FactoryReset];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Reconnect => "reconnect",
            Self::FactoryReset => "factory-reset",
        }
    }

    /// Parse a wire value, rejecting anything outside the closed set.
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        match value {
            "reset" => Ok(Self::Reset),
            "reconnect" => Ok(Self::Reconnect),
            "factory-reset" => Ok(Self::FactoryReset),
            _ => Err(ValidationError::InvalidEnumValue {
                field: field.to_string(),
                value: value.to_string(),
                allowed: Self::ALL.iter().map(|a| a.as_str().to_string()).collect(),
            }),
        }
    }
}

impl std::fmt::Display for ControlAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
