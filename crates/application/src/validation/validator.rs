use std::sync::Arc;

use domain::{ControlAction, ControlMessage, ValidationError};
use serde_json::{Map, Value};

use crate::schema::{FieldRule, ResolvedSchema};

/// Structural validation of an inbound payload against a resolved
/// contract. Stops at the first violation; never partially accepts.
///
/// Fields present in the payload but not declared by the contract are
/// ignored - the contract does not close its property set.
pub struct MessageValidator {
    schema: Arc<ResolvedSchema>,
}

impl MessageValidator {
    pub fn new(schema: Arc<ResolvedSchema>) -> Self {
        Self { schema }
    }

    pub fn validate(&self, payload: &Value) -> Result<ControlMessage, ValidationError> {
        let object = payload
            .as_object()
            .ok_or_else(|| ValidationError::TypeMismatch {
                field: "$".to_string(),
                expected: "object".to_string(),
                actual: type_name(payload).to_string(),
            })?;

        for name in &self.schema.required {
            if !object.contains_key(name) {
                return Err(ValidationError::MissingField(name.clone()));
            }
        }

        for (name, rule) in self.schema.fields() {
            if let Some(value) = object.get(name) {
                check_rule(name, rule, value)?;
            }
        }

        Ok(ControlMessage {
            id: required_string(object, "id")?,
            control: ControlAction::parse("control", &required_string(object, "control")?)?,
            device: required_string(object, "device")?,
            owner: required_string(object, "owner")?,
            parent: nullable_string(object, "parent")?,
            expected: nullable_string(object, "expected")?,
        })
    }
}

fn check_rule(field: &str, rule: &FieldRule, value: &Value) -> Result<(), ValidationError> {
    match rule {
        FieldRule::String => {
            if value.is_string() {
                Ok(())
            } else {
                Err(mismatch(field, "string", value))
            }
        }
        FieldRule::NullableString => {
            if value.is_null() || value.is_string() {
                Ok(())
            } else {
                Err(mismatch(field, "null | string", value))
            }
        }
        FieldRule::Enum(allowed) => match value.as_str() {
            None => Err(mismatch(field, "string", value)),
            Some(member) if allowed.iter().any(|a| a == member) => Ok(()),
            Some(member) => Err(ValidationError::InvalidEnumValue {
                field: field.to_string(),
                value: member.to_string(),
                allowed: allowed.clone(),
            }),
        },
    }
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match object.get(field) {
        None => Err(ValidationError::MissingField(field.to_string())),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(mismatch(field, "string", other)),
    }
}

fn nullable_string(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(mismatch(field, "null | string", other)),
    }
}

fn mismatch(field: &str, expected: &str, actual: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: type_name(actual).to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DEVICE_CONTROL, SchemaRegistry};
    use serde_json::json;

    fn validator() -> MessageValidator {
        let registry = SchemaRegistry::with_defaults();
        MessageValidator::new(registry.resolve(DEVICE_CONTROL).unwrap())
    }

    fn payload() -> Value {
        json!({
            "id": "a1",
            "control": "reset",
            "device": "dev-1",
            "owner": "own-1",
            "parent": null,
            "expected": "v3",
        })
    }

    #[test]
    fn test_valid_payload_round_trips() {
        for action in ["reset", "reconnect", "factory-reset"] {
            let mut raw = payload();
            raw["control"] = json!(action);

            let message = validator().validate(&raw).unwrap();
            assert_eq!(message.id, "a1");
            assert_eq!(message.control.as_str(), action);
            assert_eq!(message.device, "dev-1");
            assert_eq!(message.owner, "own-1");
            assert_eq!(message.parent, None);
            assert_eq!(message.expected.as_deref(), Some("v3"));
        }
    }

    #[test]
    fn test_missing_required_field_names_the_field() {
        for field in ["id", "control", "device", "owner", "parent"] {
            let mut raw = payload();
            raw.as_object_mut().unwrap().remove(field);

            let err = validator().validate(&raw).unwrap_err();
            assert_eq!(err, ValidationError::MissingField(field.to_string()));
        }
    }

    #[test]
    fn test_absent_expected_is_accepted() {
        let mut raw = payload();
        raw.as_object_mut().unwrap().remove("expected");

        let message = validator().validate(&raw).unwrap();
        assert_eq!(message.expected, None);
    }

    #[test]
    fn test_unknown_action_is_invalid_enum_value() {
        let mut raw = payload();
        raw["control"] = json!("unplug");

        let err = validator().validate(&raw).unwrap_err();
        match err {
            ValidationError::InvalidEnumValue { field, value, .. } => {
                assert_eq!(field, "control");
                assert_eq!(value, "unplug");
            }
            other => panic!("Expected InvalidEnumValue, got {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_on_non_string_device() {
        let mut raw = payload();
        raw["device"] = json!(42);

        let err = validator().validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "device".to_string(),
                expected: "string".to_string(),
                actual: "number".to_string(),
            }
        );
    }

    #[test]
    fn test_type_mismatch_on_non_nullable_parent() {
        let mut raw = payload();
        raw["parent"] = json!(["dev-0"]);

        let err = validator().validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "parent".to_string(),
                expected: "null | string".to_string(),
                actual: "array".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut raw = payload();
        raw["routing_hint"] = json!({"hops": 3});

        assert!(validator().validate(&raw).is_ok());
    }

    #[test]
    fn test_non_object_payload() {
        let err = validator().validate(&json!("reset")).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let first = validator().validate(&payload()).unwrap();
        let second = validator().validate(&first.to_value()).unwrap();
        assert_eq!(first, second);
    }
}
