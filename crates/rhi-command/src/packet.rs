use std::mem;

use bytemuck::Pod;

use crate::dispatch::{Command, CommandDispatchFunctionIndex};
use crate::error::CommandBufferError;
use crate::layout;

/// Read-only view of one recorded packet.
/// Only valid while the owning command buffer is neither cleared nor grown.
#[derive(Debug, Clone, Copy)]
pub struct CommandPacket<'a> {
    offset: u32,
    /// From the packet's first header byte to the end of the used region
    bytes: &'a [u8],
}

impl<'a> CommandPacket<'a> {
    pub(crate) fn new(used: &'a [u8], offset: u32) -> Self {
        Self {
            offset,
            bytes: &used[offset as usize..],
        }
    }

    /// Absolute byte offset of this packet inside its command buffer.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Offset of the next packet, `None` for the last one.
    pub fn next_offset(&self) -> Option<u32> {
        match layout::next_offset(self.bytes) {
            layout::INVALID_OFFSET => None,
            next => Some(next),
        }
    }

    pub fn raw_dispatch_index(&self) -> u32 {
        layout::dispatch_index(self.bytes)
    }

    pub fn dispatch_index(&self) -> Result<CommandDispatchFunctionIndex, CommandBufferError> {
        CommandDispatchFunctionIndex::try_from(self.raw_dispatch_index())
    }

    pub fn auxiliary_size(&self) -> u32 {
        layout::auxiliary_size(self.bytes)
    }

    /// The fixed fields, reinterpreted as `T`.
    /// A handler must only ask for the type matching the packet's dispatch index.
    pub fn fields<T: Command>(&self) -> &'a T {
        debug_assert_eq!(
            self.raw_dispatch_index(),
            T::DISPATCH_FUNCTION_INDEX as u32,
            "packet at offset {} read as the wrong command type",
            self.offset
        );
        layout::command_fields(self.bytes)
    }

    /// Auxiliary bytes trailing the `T` fields.
    pub fn auxiliary<T: Command>(&self) -> &'a [u8] {
        layout::auxiliary_memory::<T>(self.bytes)
    }

    /// Auxiliary bytes viewed as an array of `E`.
    pub fn auxiliary_as<T: Command, E: Pod>(&self) -> Result<&'a [E], CommandBufferError> {
        let auxiliary = self.auxiliary::<T>();
        bytemuck::try_cast_slice(auxiliary).map_err(|_| CommandBufferError::AuxiliaryLayout {
            size: auxiliary.len(),
            element_size: mem::size_of::<E>(),
        })
    }
}

/// Iterator over the packet chain, in recording order.
pub struct CommandPackets<'a> {
    used: &'a [u8],
    next: u32,
}

impl<'a> CommandPackets<'a> {
    pub(crate) fn new(used: &'a [u8], first: u32) -> Self {
        Self { used, next: first }
    }
}

impl<'a> Iterator for CommandPackets<'a> {
    type Item = CommandPacket<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == layout::INVALID_OFFSET {
            return None;
        }
        let packet = CommandPacket::new(self.used, self.next);
        self.next = layout::next_offset(packet.bytes);
        Some(packet)
    }
}
