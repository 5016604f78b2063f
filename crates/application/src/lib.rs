//! Application layer - The control-message exchange pipeline

pub mod exchange;
pub mod guard;
pub mod resolution;
pub mod schema;
pub mod validation;

pub use exchange::{ControlExchange, ControlListener, ExchangeOutcome, InboundEnvelope};
pub use guard::PreconditionGuard;
pub use resolution::DeviceResolver;
pub use schema::{DEVICE_CONTROL, SchemaRegistry};
pub use validation::MessageValidator;
