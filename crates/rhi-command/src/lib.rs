//! Backend-agnostic command recording.
//!
//! Commands are packed into one contiguous byte arena owned by a
//! [`CommandBuffer`], chained by `u32` offsets, and later replayed against a
//! backend through a table of functions indexed by
//! [`CommandDispatchFunctionIndex`].

pub mod handle;
pub mod layout;
pub mod packet;
pub mod buffer;
pub mod commands;
pub mod dispatch;
pub mod error;

pub use buffer::{CommandBuffer, CommandSlot, GrowthPolicy};
pub use dispatch::{Command, CommandDispatchFunctionIndex, DispatchFunction, DispatchTable, Rhi};
pub use error::CommandBufferError;
pub use handle::{ResourceHandle, ResourceType};
pub use packet::{CommandPacket, CommandPackets};
