mod registry;
mod rules;

pub use registry::{DEVICE_CONTROL, SchemaRegistry};
pub use rules::{FieldRule, ResolvedSchema};
