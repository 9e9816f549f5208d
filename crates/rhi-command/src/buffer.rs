//! Growable, offset-chained command packet arena.

use std::fmt;
use std::mem;

use tracing::debug;

use crate::dispatch::{Command, Rhi};
use crate::error::CommandBufferError;
use crate::layout::{self, INVALID_OFFSET, PACKET_ALIGNMENT};
use crate::packet::CommandPackets;

/// Bytes added on each growth on top of what the triggering operation needs.
pub const DEFAULT_GROWTH_QUANTUM: u32 = 8192;

/// Largest byte count a command buffer may reach; offsets must stay below the sentinel.
pub const MAXIMUM_NUMBER_OF_BYTES: u32 = INVALID_OFFSET - 1;

/// How a command buffer allocates and grows its packet storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Bytes allocated up front
    pub initial_capacity: u32,
    /// Extra bytes allocated on each growth
    pub growth_quantum: u32,
    /// Hard limit for the used byte count
    pub max_bytes: u32,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth_quantum: DEFAULT_GROWTH_QUANTUM,
            max_bytes: MAXIMUM_NUMBER_OF_BYTES,
        }
    }
}

/// Mutable views handed out by [`CommandBuffer::add_command`].
pub struct CommandSlot<'a, T> {
    pub fields: &'a mut T,
    pub auxiliary: &'a mut [u8],
}

/// Records commands into one contiguous allocation.
///
/// Packets reference each other by byte offset, never by pointer, so the
/// storage can be reallocated or copied into another buffer while the chain
/// stays valid.
#[derive(Clone)]
pub struct CommandBuffer {
    /// `u64` words keep every packet aligned to `PACKET_ALIGNMENT`
    storage: Vec<u64>,
    previous_packet_offset: u32,
    current_packet_offset: u32,
    number_of_commands: u32,
    policy: GrowthPolicy,
}

impl fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommandBuffer commands: {} bytes: {}/{}",
            self.number_of_commands,
            self.current_packet_offset,
            self.capacity()
        )
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        let policy = GrowthPolicy {
            max_bytes: policy.max_bytes.min(MAXIMUM_NUMBER_OF_BYTES),
            ..policy
        };
        let words = (layout::align_up(policy.initial_capacity as u64) / PACKET_ALIGNMENT as u64) as usize;
        Self {
            storage: vec![0; words],
            previous_packet_offset: INVALID_OFFSET,
            current_packet_offset: 0,
            number_of_commands: 0,
            policy,
        }
    }

    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.previous_packet_offset == INVALID_OFFSET
    }

    /// Used bytes.
    pub fn size(&self) -> u32 {
        self.current_packet_offset
    }

    /// Allocated bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len() * PACKET_ALIGNMENT
    }

    /// Commands recorded since creation or the last clear. Diagnostics only.
    pub fn number_of_commands(&self) -> u32 {
        self.number_of_commands
    }

    /// The used region, packet headers included.
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.storage)[..self.current_packet_offset as usize]
    }

    fn storage_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.storage)
    }

    /// Reserve a packet for `T` followed by `auxiliary_bytes` bytes.
    ///
    /// The packet is zeroed and linked after the previously recorded one; the
    /// caller fills in the returned fields and auxiliary bytes in place.
    pub fn add_command<T: Command>(
        &mut self,
        auxiliary_bytes: u32,
    ) -> Result<CommandSlot<'_, T>, CommandBufferError> {
        const { assert!(mem::align_of::<T>() <= PACKET_ALIGNMENT) };

        let packet_size = layout::packet_size::<T>(auxiliary_bytes);
        let end = self.checked_end(packet_size)?;
        self.reserve(end, packet_size);

        let start = self.current_packet_offset;
        let previous = self.previous_packet_offset;
        let bytes = self.storage_bytes_mut();
        if previous != INVALID_OFFSET {
            layout::store_next_offset(&mut bytes[previous as usize..], start);
        }

        let packet = &mut bytes[start as usize..end as usize];
        packet.fill(0);
        layout::store_next_offset(packet, INVALID_OFFSET);
        layout::store_dispatch_index(packet, T::DISPATCH_FUNCTION_INDEX as u32);
        layout::store_auxiliary_size(packet, auxiliary_bytes);

        self.previous_packet_offset = start;
        self.current_packet_offset = end;
        self.number_of_commands += 1;

        let packet = &mut self.storage_bytes_mut()[start as usize..end as usize];
        let (head, tail) = packet.split_at_mut(layout::HEADER_SIZE + mem::size_of::<T>());
        Ok(CommandSlot {
            fields: bytemuck::from_bytes_mut(&mut head[layout::HEADER_SIZE..]),
            auxiliary: &mut tail[..auxiliary_bytes as usize],
        })
    }

    /// End offset after appending `additional` bytes, if it stays within the limit.
    fn checked_end(&self, additional: u64) -> Result<u32, CommandBufferError> {
        let end = self.current_packet_offset as u64 + additional;
        if end > self.policy.max_bytes as u64 {
            return Err(CommandBufferError::CapacityExceeded {
                requested: end,
                maximum: self.policy.max_bytes,
            });
        }
        Ok(end as u32)
    }

    /// Grow to hold `end` bytes: old capacity + growth quantum + `needed`.
    fn reserve(&mut self, end: u32, needed: u64) {
        if end as usize <= self.capacity() {
            return;
        }

        let grown = (self.capacity() as u64 + self.policy.growth_quantum as u64 + needed)
            .min(self.policy.max_bytes as u64);
        let words = (layout::align_up(grown) / PACKET_ALIGNMENT as u64) as usize;
        debug!(
            old_capacity = self.capacity(),
            new_capacity = words * PACKET_ALIGNMENT,
            "growing command buffer"
        );

        let used_words = self.current_packet_offset as usize / PACKET_ALIGNMENT;
        let mut storage = Vec::with_capacity(words);
        storage.extend_from_slice(&self.storage[..used_words]);
        storage.resize(words, 0);
        self.storage = storage;
    }

    /// Forget every recorded packet. The allocation is kept for reuse.
    pub fn clear(&mut self) {
        self.previous_packet_offset = INVALID_OFFSET;
        self.current_packet_offset = 0;
        self.number_of_commands = 0;
    }

    /// Walk the packet chain in recording order.
    pub fn packets(&self) -> CommandPackets<'_> {
        let first = if self.is_empty() { INVALID_OFFSET } else { 0 };
        CommandPackets::new(self.as_bytes(), first)
    }

    /// Invoke the backend's handler for every packet, in recording order.
    /// The buffer is left untouched and can be dispatched again.
    pub fn dispatch_to_rhi<R: Rhi>(&self, rhi: &mut R) {
        let table = R::dispatch_table();
        for packet in self.packets() {
            (table[packet.raw_dispatch_index() as usize])(&packet, rhi);
        }
    }

    pub fn dispatch_to_rhi_and_clear<R: Rhi>(&mut self, rhi: &mut R) {
        self.dispatch_to_rhi(rhi);
        self.clear();
    }

    /// Copy every packet of this buffer to the tail of `other`.
    ///
    /// The used region is copied in one go, then the links inside the copy are
    /// shifted by `other`'s previous size and `other`'s last packet is linked
    /// to the first copied one.
    pub fn append_to_command_buffer(&self, other: &mut CommandBuffer) -> Result<(), CommandBufferError> {
        if self.is_empty() {
            return Err(CommandBufferError::EmptySource);
        }

        let copied = self.current_packet_offset;
        let base = other.current_packet_offset;
        let end = other.checked_end(copied as u64)?;
        other.reserve(end, copied as u64);

        let previous = other.previous_packet_offset;
        let bytes = other.storage_bytes_mut();
        let region = &mut bytes[base as usize..end as usize];
        region.copy_from_slice(self.as_bytes());

        let mut offset = 0usize;
        loop {
            let next = layout::next_offset(&region[offset..]);
            if next == INVALID_OFFSET {
                break;
            }
            layout::store_next_offset(&mut region[offset..], next + base);
            offset = next as usize;
        }

        if previous != INVALID_OFFSET {
            layout::store_next_offset(&mut bytes[previous as usize..], base);
        }

        other.previous_packet_offset = base + self.previous_packet_offset;
        other.current_packet_offset = end;
        other.number_of_commands += self.number_of_commands;

        debug!(
            commands = self.number_of_commands,
            bytes = copied,
            at = base,
            "appended command buffer"
        );
        Ok(())
    }

    pub fn append_to_command_buffer_and_clear(
        &mut self,
        other: &mut CommandBuffer,
    ) -> Result<(), CommandBufferError> {
        self.append_to_command_buffer(other)?;
        self.clear();
        Ok(())
    }
}
