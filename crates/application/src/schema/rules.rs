use std::collections::HashMap;
use std::sync::Arc;

use domain::SchemaError;
use serde_json::Value;

/// A single field constraint, compiled from the draft-07 subset the
/// contracts use (`type`, `enum`, `oneOf` of null/string).
#[derive(Debug, PartialEq, Eq)]
pub enum FieldRule {
    /// `{"type": "string"}`
    String,
    /// `{"oneOf": [{"type": "null"}, {"type": "string"}]}`
    NullableString,
    /// `{"type": "string", "enum": [...]}` - closed membership set
    Enum(Vec<String>),
}

/// A contract with every internal `$ref` expanded, ready for repeated
/// validation use. Fields referencing the same definition share one
/// rule allocation.
#[derive(Debug)]
pub struct ResolvedSchema {
    pub message_type: String,
    /// Required field names, in the order the contract declares them
    pub required: Vec<String>,
    fields: Vec<(String, Arc<FieldRule>)>,
}

impl ResolvedSchema {
    /// Compile a raw schema document, expanding `$ref` pointers into
    /// shared rules. Fails on dangling references or rule shapes
    /// outside the supported subset.
    pub fn compile(message_type: &str, document: &Value) -> Result<Self, SchemaError> {
        let malformed = |reason: String| SchemaError::SchemaMalformed {
            message_type: message_type.to_string(),
            reason,
        };

        let properties = document
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed("'properties' must be an object".to_string()))?;

        // Definitions referenced more than once resolve to the same Arc
        let mut shared: HashMap<String, Arc<FieldRule>> = HashMap::new();
        let mut fields = Vec::with_capacity(properties.len());

        for (name, declaration) in properties {
            let rule = match declaration.get("$ref").and_then(Value::as_str) {
                Some(pointer) => {
                    if let Some(existing) = shared.get(pointer) {
                        existing.clone()
                    } else {
                        let target = deref(document, pointer).ok_or_else(|| {
                            malformed(format!("dangling $ref '{pointer}' for field '{name}'"))
                        })?;
                        let compiled = Arc::new(compile_rule(target).map_err(&malformed)?);
                        shared.insert(pointer.to_string(), compiled.clone());
                        compiled
                    }
                }
                None => Arc::new(compile_rule(declaration).map_err(&malformed)?),
            };

            fields.push((name.clone(), rule));
        }

        let required = match document.get("required") {
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| {
                    entry
                        .as_str()
                        .map(str::to_string)
                        .ok_or_else(|| malformed("'required' entries must be strings".to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(malformed("'required' must be an array".to_string())),
            None => Vec::new(),
        };

        Ok(Self {
            message_type: message_type.to_string(),
            required,
            fields,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Arc<FieldRule>)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn rule(&self, name: &str) -> Option<&Arc<FieldRule>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rule)| rule)
    }
}

/// Follow an internal `#/...` pointer inside the document.
fn deref<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    let path = pointer.strip_prefix('#')?;
    document.pointer(path)
}

fn compile_rule(declaration: &Value) -> Result<FieldRule, String> {
    if let Some(allowed) = declaration.get("enum") {
        let values = allowed
            .as_array()
            .ok_or_else(|| "'enum' must be an array".to_string())?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| "'enum' members must be strings".to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(FieldRule::Enum(values));
    }

    if let Some(branches) = declaration.get("oneOf") {
        let branches = branches
            .as_array()
            .ok_or_else(|| "'oneOf' must be an array".to_string())?;

        let mut types: Vec<&str> = branches
            .iter()
            .filter_map(|b| b.get("type").and_then(Value::as_str))
            .collect();
        types.sort_unstable();

        if types == ["null", "string"] {
            return Ok(FieldRule::NullableString);
        }

        return Err(format!("unsupported 'oneOf' union {types:?}"));
    }

    match declaration.get("type").and_then(Value::as_str) {
        Some("string") => Ok(FieldRule::String),
        Some(other) => Err(format!("unsupported field type '{other}'")),
        None => Err("field declares neither 'type', 'enum', 'oneOf' nor '$ref'".to_string()),
    }
}
