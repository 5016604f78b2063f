use thiserror::Error;

/// Schema registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("No schema registered for message type: {0}")]
    SchemaNotFound(String),

    #[error("Schema for '{message_type}' is malformed: {reason}")]
    SchemaMalformed { message_type: String, reason: String },
}

/// Structural validation errors. Validation stops at the first violation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid value '{value}' for field '{field}', allowed: {allowed:?}")]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

/// Device resolution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Owner mismatch: device is owned by '{expected}', message claims '{claimed}'")]
    OwnerMismatch { expected: String, claimed: String },

    #[error("Device directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Optimistic-concurrency precondition violation.
///
/// `actual` is `None` when the device currently reports no state token.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Precondition failed: expected state '{expected}', device reports {actual:?}")]
pub struct PreconditionFailed {
    pub expected: String,
    pub actual: Option<String>,
}

/// The single reason attached to a rejected message.
///
/// A message either passes all four stages or is rejected with exactly
/// one of these; no stage is retried by the exchange itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectionReason {
    #[error("Payload is not a valid exchange message: {0}")]
    MalformedEnvelope(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Precondition(#[from] PreconditionFailed),
}

/// Failure of the device directory capability itself (not a lookup miss).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Directory lookup failed: {0}")]
pub struct DirectoryError(pub String);

/// Failure of the dispatch handoff. Infrastructure fault, not part of
/// the message rejection taxonomy.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Dispatch failed: {0}")]
pub struct DispatchError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_reason_from_stage_errors() {
        let reason: RejectionReason = ValidationError::MissingField("owner".to_string()).into();
        assert_eq!(
            reason,
            RejectionReason::Validation(ValidationError::MissingField("owner".to_string()))
        );

        let reason: RejectionReason = ResolutionError::UnknownDevice("dev-9".to_string()).into();
        assert!(matches!(reason, RejectionReason::Resolution(_)));
    }

    #[test]
    fn test_precondition_failed_display() {
        let err = PreconditionFailed {
            expected: "v3".to_string(),
            actual: Some("v4".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("v3"));
        assert!(msg.contains("v4"));
    }
}
