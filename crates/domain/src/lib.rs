//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Wire entities (ControlMessage, ControlAction)
//! - Directory snapshots (DeviceRecord, DeviceContext)
//! - Capability interfaces (DeviceDirectory, CommandDispatcher, EventPublisher)
//! - The full rejection taxonomy for the control exchange
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod device;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod message;

// Re-export commonly used types
pub use device::{DeviceContext, DeviceDirectory, DeviceRecord};
pub use dispatch::{CommandDispatcher, ValidatedCommand};
pub use error::{
    DirectoryError, DispatchError, PreconditionFailed, RejectionReason, ResolutionError,
    SchemaError, ValidationError,
};
pub use event::GatewayEvent;
pub use message::{ControlAction, ControlMessage};
