use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use domain::SchemaError;
use serde_json::Value;
use tracing::debug;

use super::ResolvedSchema;

/// Message type of the device-control contract.
pub const DEVICE_CONTROL: &str = "device.control";

const DEVICE_CONTROL_SCHEMA: &str = include_str!("../../schemas/device-control.json");

/// Indexes contract documents by message type and hands out resolved
/// schemas. Resolution runs once per message type; later lookups return
/// the same shared schema without re-parsing.
pub struct SchemaRegistry {
    documents: HashMap<String, Value>,
    resolved: DashMap<String, Arc<ResolvedSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            resolved: DashMap::new(),
        }
    }

    /// Registry pre-loaded with the contracts this gateway ships.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            DEVICE_CONTROL,
            serde_json::from_str(DEVICE_CONTROL_SCHEMA)
                .expect("embedded device-control contract is valid JSON"),
        );
        registry
    }

    /// Register a raw contract document under a message type. Replaces
    /// any previous document and drops its memoized resolution.
    pub fn register(&mut self, message_type: impl Into<String>, document: Value) {
        let message_type = message_type.into();
        self.resolved.remove(&message_type);
        self.documents.insert(message_type, document);
    }

    pub fn resolve(&self, message_type: &str) -> Result<Arc<ResolvedSchema>, SchemaError> {
        if let Some(hit) = self.resolved.get(message_type) {
            return Ok(hit.clone());
        }

        let document = self
            .documents
            .get(message_type)
            .ok_or_else(|| SchemaError::SchemaNotFound(message_type.to_string()))?;

        let schema = Arc::new(ResolvedSchema::compile(message_type, document)?);
        debug!(message_type = %message_type, "Resolved contract schema");

        Ok(self
            .resolved
            .entry(message_type.to_string())
            .or_insert(schema)
            .clone())
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
