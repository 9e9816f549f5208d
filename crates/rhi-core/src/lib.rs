pub mod config;
pub mod error;
pub mod resource_registry;

pub use config::{CommandBufferConfig, NullBackendConfig, RhiConfig};
pub use error::CoreError;
pub use resource_registry::{ResourceDescription, ResourceRegistry};
