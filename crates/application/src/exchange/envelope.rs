use domain::RejectionReason;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transport-agnostic wrapper around every inbound exchange message:
/// the routing key selects the contract, the origin identifies the
/// sender, and `data` carries the actual payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboundEnvelope {
    pub routing_key: String,
    pub origin: String,
    pub data: Value,
}

impl InboundEnvelope {
    pub fn new(
        routing_key: impl Into<String>,
        origin: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            routing_key: routing_key.into(),
            origin: origin.into(),
            data,
        }
    }

    /// Parse raw transport bytes. Anything that is not a well-formed
    /// envelope is rejected before the pipeline starts.
    pub fn parse(raw: &str) -> Result<Self, RejectionReason> {
        serde_json::from_str(raw).map_err(|e| RejectionReason::MalformedEnvelope(e.to_string()))
    }
}
