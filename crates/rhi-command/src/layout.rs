//! Byte layout of a command packet.
//!
//! ```text
//! [next packet offset: u32][dispatch index: u32][auxiliary size: u32][reserved: u32]
//! [command fields: T][auxiliary bytes][padding to PACKET_ALIGNMENT]
//! ```
//!
//! Every function here takes the packet slice starting at the packet's first
//! header byte. None of them check the packet is well formed; the command
//! buffer is the only writer and upholds the layout.

use std::mem;

use bytemuck::Pod;

/// Link value marking "no next packet".
pub const INVALID_OFFSET: u32 = u32::MAX;

/// Packets start (and command fields start) on this boundary.
pub const PACKET_ALIGNMENT: usize = 8;

/// Header size in bytes: next(4) + dispatch index(4) + auxiliary size(4) + reserved(4) = 16
pub const HEADER_SIZE: usize = 16;

const NEXT_OFFSET_FIELD: usize = 0;
const DISPATCH_INDEX_FIELD: usize = 4;
const AUXILIARY_SIZE_FIELD: usize = 8;

/// Round `bytes` up to the packet alignment.
pub const fn align_up(bytes: u64) -> u64 {
    let mask = PACKET_ALIGNMENT as u64 - 1;
    (bytes + mask) & !mask
}

/// Total bytes a packet of `T` with `auxiliary_bytes` trailing bytes occupies.
/// Computed in 64 bits so callers can check it against the 32-bit bound.
pub fn packet_size<T>(auxiliary_bytes: u32) -> u64 {
    align_up(HEADER_SIZE as u64 + mem::size_of::<T>() as u64 + auxiliary_bytes as u64)
}

fn load_u32(packet: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&packet[at..at + 4]);
    u32::from_le_bytes(raw)
}

fn store_u32(packet: &mut [u8], at: usize, value: u32) {
    packet[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

pub fn next_offset(packet: &[u8]) -> u32 {
    load_u32(packet, NEXT_OFFSET_FIELD)
}

pub fn store_next_offset(packet: &mut [u8], value: u32) {
    store_u32(packet, NEXT_OFFSET_FIELD, value);
}

pub fn dispatch_index(packet: &[u8]) -> u32 {
    load_u32(packet, DISPATCH_INDEX_FIELD)
}

pub fn store_dispatch_index(packet: &mut [u8], value: u32) {
    store_u32(packet, DISPATCH_INDEX_FIELD, value);
}

pub fn auxiliary_size(packet: &[u8]) -> u32 {
    load_u32(packet, AUXILIARY_SIZE_FIELD)
}

pub fn store_auxiliary_size(packet: &mut [u8], value: u32) {
    store_u32(packet, AUXILIARY_SIZE_FIELD, value);
}

/// Typed view of the command fields.
///
/// # Panics
/// If the fields region is not aligned for `T`, which cannot happen for
/// packets written by a command buffer.
pub fn command_fields<T: Pod>(packet: &[u8]) -> &T {
    bytemuck::from_bytes(&packet[HEADER_SIZE..HEADER_SIZE + mem::size_of::<T>()])
}

pub fn command_fields_mut<T: Pod>(packet: &mut [u8]) -> &mut T {
    bytemuck::from_bytes_mut(&mut packet[HEADER_SIZE..HEADER_SIZE + mem::size_of::<T>()])
}

/// Auxiliary bytes, located right after the `T` fields.
pub fn auxiliary_memory<T>(packet: &[u8]) -> &[u8] {
    let start = HEADER_SIZE + mem::size_of::<T>();
    &packet[start..start + auxiliary_size(packet) as usize]
}

pub fn auxiliary_memory_mut<T>(packet: &mut [u8]) -> &mut [u8] {
    let start = HEADER_SIZE + mem::size_of::<T>();
    let len = auxiliary_size(packet) as usize;
    &mut packet[start..start + len]
}
