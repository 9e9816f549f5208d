use rhi_command::CommandBufferError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("config parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("command buffer error: {0}")]
    Command(#[from] CommandBufferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
