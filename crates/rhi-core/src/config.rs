use std::path::Path;

use rhi_command::buffer::{DEFAULT_GROWTH_QUANTUM, MAXIMUM_NUMBER_OF_BYTES};
use rhi_command::{CommandBuffer, GrowthPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Top-level RHI configuration, loaded from rhi.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhiConfig {
    #[serde(default)]
    pub command_buffer: CommandBufferConfig,
    #[serde(default)]
    pub null_backend: NullBackendConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBufferConfig {
    /// Bytes allocated when a command buffer is created
    #[serde(default)]
    pub initial_capacity: u32,
    /// Bytes added on each growth on top of what the growing operation needs
    #[serde(default = "default_growth_quantum")]
    pub growth_quantum: u32,
    /// Hard limit for the recorded byte count
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullBackendConfig {
    /// Skip commands that reference unknown or mistyped resources
    #[serde(default = "default_true")]
    pub validate_resources: bool,
    /// Emit a trace event for every dispatched command
    #[serde(default)]
    pub log_commands: bool,
}

impl Default for CommandBufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth_quantum: default_growth_quantum(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl Default for NullBackendConfig {
    fn default() -> Self {
        Self {
            validate_resources: true,
            log_commands: false,
        }
    }
}

impl CommandBufferConfig {
    /// Growth policy for new command buffers. `max_bytes` is clamped below the
    /// offset sentinel.
    pub fn growth_policy(&self) -> GrowthPolicy {
        if self.max_bytes > MAXIMUM_NUMBER_OF_BYTES {
            warn!(
                max_bytes = self.max_bytes,
                limit = MAXIMUM_NUMBER_OF_BYTES,
                "command buffer max_bytes clamped"
            );
        }
        GrowthPolicy {
            initial_capacity: self.initial_capacity,
            growth_quantum: self.growth_quantum,
            max_bytes: self.max_bytes.min(MAXIMUM_NUMBER_OF_BYTES),
        }
    }

    pub fn create_command_buffer(&self) -> CommandBuffer {
        CommandBuffer::with_policy(self.growth_policy())
    }
}

impl RhiConfig {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let config: RhiConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::parse(&content)?;
        debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(CoreError::Io(_)) => Self::default(),
            Err(e) => {
                warn!(path = %path.as_ref().display(), "ignoring invalid configuration: {}", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.command_buffer.initial_capacity > self.command_buffer.max_bytes {
            return Err(CoreError::ConfigError(format!(
                "initial_capacity {} exceeds max_bytes {}",
                self.command_buffer.initial_capacity, self.command_buffer.max_bytes
            )));
        }
        Ok(())
    }
}

/// Returns the default config file path.
/// Search order:
/// 1. System-wide config: `%PROGRAMDATA%\RHI\rhi.toml` (Windows) or `/etc/rhi/rhi.toml`
/// 2. Local fallback: `./rhi.toml`
pub fn default_config_path() -> String {
    #[cfg(windows)]
    {
        let programdata = std::env::var("PROGRAMDATA")
            .unwrap_or_else(|_| r"C:\ProgramData".to_string());
        let system_path = format!(r"{}\RHI\rhi.toml", programdata);
        if Path::new(&system_path).exists() {
            return system_path;
        }
    }
    #[cfg(not(windows))]
    {
        let system_path = "/etc/rhi/rhi.toml";
        if Path::new(system_path).exists() {
            return system_path.to_string();
        }
    }
    "rhi.toml".to_string()
}

fn default_growth_quantum() -> u32 {
    DEFAULT_GROWTH_QUANTUM
}

fn default_max_bytes() -> u32 {
    MAXIMUM_NUMBER_OF_BYTES
}

fn default_true() -> bool {
    true
}
