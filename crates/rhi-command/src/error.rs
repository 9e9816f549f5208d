#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandBufferError {
    #[error("command buffer capacity exceeded: {requested} bytes requested, maximum is {maximum}")]
    CapacityExceeded { requested: u64, maximum: u32 },

    #[error("cannot append an empty command buffer")]
    EmptySource,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown dispatch index: {0}")]
    UnknownDispatchIndex(u32),

    #[error("auxiliary memory of {size} bytes cannot be viewed as elements of {element_size} bytes")]
    AuxiliaryLayout { size: usize, element_size: usize },
}
