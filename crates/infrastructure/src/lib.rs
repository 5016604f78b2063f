//! Infrastructure layer - External integrations

pub mod config;
pub mod directory;
pub mod dispatch;
pub mod messaging;

pub use config::{DeviceSeed, DirectoryConfig, GatewayConfig};
pub use directory::{MemoryDeviceDirectory, PgDeviceDirectory};
pub use dispatch::ChannelCommandDispatcher;
pub use messaging::{ChannelEventPublisher, CompositeEventPublisher, TracingEventPublisher};
