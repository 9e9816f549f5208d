//! Command descriptors.
//!
//! Each command kind is a plain-old-data record written in place into a
//! packet by its `create` factory. Variable-length data (viewport arrays,
//! inline draw arguments, uniform bytes) is always copied into the packet's
//! auxiliary bytes, so a recorded buffer never points at caller memory.

use std::mem;

use bytemuck::{Pod, Zeroable};
use tracing::warn;

use crate::buffer::{CommandBuffer, MAXIMUM_NUMBER_OF_BYTES};
use crate::dispatch::{Command, CommandDispatchFunctionIndex};
use crate::error::CommandBufferError;
use crate::handle::{ResourceHandle, ResourceType};

/// Size of the NUL-terminated name stored by debug markers and events.
pub const DEBUG_NAME_LENGTH: usize = 128;

bitflags::bitflags! {
    /// What `ClearGraphics` clears.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR       = 0b0000_0001;
        const DEPTH       = 0b0000_0010;
        const STENCIL     = 0b0000_0100;
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QueryControlFlags: u32 {
        /// Occlusion queries return exact sample counts
        const PRECISE = 0b0000_0001;
    }
}

// ── Validation helpers ──────────────────────────────────────

fn invalid(message: String) -> CommandBufferError {
    CommandBufferError::InvalidArgument(message)
}

fn check_resource(
    handle: ResourceHandle,
    what: &str,
    accepts: fn(ResourceType) -> bool,
) -> Result<(), CommandBufferError> {
    match handle.resource_type() {
        Some(resource_type) if !handle.is_null() && accepts(resource_type) => Ok(()),
        _ => Err(invalid(format!("{} must not be {:?}", what, handle))),
    }
}

/// Like `check_resource`, but a null handle (unbind) is fine.
fn check_optional_resource(
    handle: ResourceHandle,
    what: &str,
    accepts: fn(ResourceType) -> bool,
) -> Result<(), CommandBufferError> {
    if handle.is_null() {
        Ok(())
    } else {
        check_resource(handle, what, accepts)
    }
}

fn auxiliary_length(bytes: usize) -> Result<u32, CommandBufferError> {
    u32::try_from(bytes).map_err(|_| CommandBufferError::CapacityExceeded {
        requested: bytes as u64,
        maximum: MAXIMUM_NUMBER_OF_BYTES,
    })
}

fn create_fixed<T: Command>(buffer: &mut CommandBuffer, fields: T) -> Result<(), CommandBufferError> {
    let slot = buffer.add_command::<T>(0)?;
    *slot.fields = fields;
    Ok(())
}

fn create_with_auxiliary<T: Command>(
    buffer: &mut CommandBuffer,
    fields: T,
    auxiliary: &[u8],
) -> Result<(), CommandBufferError> {
    let slot = buffer.add_command::<T>(auxiliary_length(auxiliary.len())?)?;
    *slot.fields = fields;
    slot.auxiliary.copy_from_slice(auxiliary);
    Ok(())
}

fn encode_debug_name(name: &str) -> [u8; DEBUG_NAME_LENGTH] {
    let mut encoded = [0u8; DEBUG_NAME_LENGTH];
    let mut length = name.len();
    if length >= DEBUG_NAME_LENGTH {
        warn!(
            name,
            limit = DEBUG_NAME_LENGTH - 1,
            "debug name too long, truncating"
        );
        length = DEBUG_NAME_LENGTH - 1;
        while !name.is_char_boundary(length) {
            length -= 1;
        }
    }
    encoded[..length].copy_from_slice(&name.as_bytes()[..length]);
    encoded
}

fn decode_debug_name(encoded: &[u8; DEBUG_NAME_LENGTH]) -> &str {
    let length = encoded.iter().position(|&b| b == 0).unwrap_or(DEBUG_NAME_LENGTH);
    std::str::from_utf8(&encoded[..length]).unwrap_or_default()
}

// ── Shared argument records ─────────────────────────────────

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Viewport {
    pub top_left_x: f32,
    pub top_left_y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ScissorRectangle {
    pub top_left_x: i32,
    pub top_left_y: i32,
    pub bottom_right_x: i32,
    pub bottom_right_y: i32,
}

/// Same layout as an indirect buffer entry for non-indexed draws.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawArguments {
    pub vertex_count_per_instance: u32,
    pub instance_count: u32,
    pub start_vertex_location: u32,
    pub start_instance_location: u32,
}

impl DrawArguments {
    /// One instance, starting at vertex and instance zero.
    pub const fn new(vertex_count_per_instance: u32) -> Self {
        Self {
            vertex_count_per_instance,
            instance_count: 1,
            start_vertex_location: 0,
            start_instance_location: 0,
        }
    }
}

/// Same layout as an indirect buffer entry for indexed draws.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedArguments {
    pub index_count_per_instance: u32,
    pub instance_count: u32,
    pub start_index_location: u32,
    pub base_vertex_location: i32,
    pub start_instance_location: u32,
}

impl DrawIndexedArguments {
    /// One instance, starting at index, vertex and instance zero.
    pub const fn new(index_count_per_instance: u32) -> Self {
        Self {
            index_count_per_instance,
            instance_count: 1,
            start_index_location: 0,
            base_vertex_location: 0,
            start_instance_location: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawMeshTasksArguments {
    pub number_of_tasks: u32,
    pub first_task: u32,
}

// ── Graphics ────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsRootSignature {
    pub root_signature: ResourceHandle,
}

impl Command for SetGraphicsRootSignature {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetGraphicsRootSignature;
}

impl SetGraphicsRootSignature {
    /// A null handle unbinds the current root signature.
    pub fn create(buffer: &mut CommandBuffer, root_signature: ResourceHandle) -> Result<(), CommandBufferError> {
        check_optional_resource(root_signature, "graphics root signature", |t| {
            t == ResourceType::RootSignature
        })?;
        create_fixed(buffer, Self { root_signature })
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsPipelineState {
    pub graphics_pipeline_state: ResourceHandle,
}

impl Command for SetGraphicsPipelineState {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetGraphicsPipelineState;
}

impl SetGraphicsPipelineState {
    pub fn create(
        buffer: &mut CommandBuffer,
        graphics_pipeline_state: ResourceHandle,
    ) -> Result<(), CommandBufferError> {
        check_optional_resource(graphics_pipeline_state, "graphics pipeline state", |t| {
            t == ResourceType::GraphicsPipelineState
        })?;
        create_fixed(buffer, Self { graphics_pipeline_state })
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsResourceGroup {
    pub resource_group: ResourceHandle,
    /// Root parameter the group is bound to
    pub root_parameter_index: u32,
    reserved: u32,
}

impl Command for SetGraphicsResourceGroup {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetGraphicsResourceGroup;
}

impl SetGraphicsResourceGroup {
    pub fn create(
        buffer: &mut CommandBuffer,
        root_parameter_index: u32,
        resource_group: ResourceHandle,
    ) -> Result<(), CommandBufferError> {
        check_optional_resource(resource_group, "graphics resource group", |t| {
            t == ResourceType::ResourceGroup
        })?;
        create_fixed(
            buffer,
            Self {
                resource_group,
                root_parameter_index,
                reserved: 0,
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsVertexArray {
    pub vertex_array: ResourceHandle,
}

impl Command for SetGraphicsVertexArray {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetGraphicsVertexArray;
}

impl SetGraphicsVertexArray {
    pub fn create(buffer: &mut CommandBuffer, vertex_array: ResourceHandle) -> Result<(), CommandBufferError> {
        check_optional_resource(vertex_array, "vertex array", |t| t == ResourceType::VertexArray)?;
        create_fixed(buffer, Self { vertex_array })
    }
}

/// Followed by `number_of_viewports` [`Viewport`] records in auxiliary memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsViewports {
    pub number_of_viewports: u32,
}

impl Command for SetGraphicsViewports {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetGraphicsViewports;
}

impl SetGraphicsViewports {
    pub fn create(buffer: &mut CommandBuffer, viewports: &[Viewport]) -> Result<(), CommandBufferError> {
        if viewports.is_empty() {
            return Err(invalid("at least one viewport is required".to_string()));
        }
        let number_of_viewports = auxiliary_length(viewports.len())?;
        create_with_auxiliary(
            buffer,
            Self { number_of_viewports },
            bytemuck::cast_slice(viewports),
        )
    }

    /// Single viewport covering depth 0 to 1.
    pub fn create_single(
        buffer: &mut CommandBuffer,
        top_left_x: f32,
        top_left_y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), CommandBufferError> {
        Self::create(
            buffer,
            &[Viewport {
                top_left_x,
                top_left_y,
                width,
                height,
                min_depth: 0.0,
                max_depth: 1.0,
            }],
        )
    }
}

/// Followed by `number_of_scissor_rectangles` [`ScissorRectangle`] records in auxiliary memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsScissorRectangles {
    pub number_of_scissor_rectangles: u32,
}

impl Command for SetGraphicsScissorRectangles {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetGraphicsScissorRectangles;
}

impl SetGraphicsScissorRectangles {
    pub fn create(
        buffer: &mut CommandBuffer,
        scissor_rectangles: &[ScissorRectangle],
    ) -> Result<(), CommandBufferError> {
        if scissor_rectangles.is_empty() {
            return Err(invalid("at least one scissor rectangle is required".to_string()));
        }
        let number_of_scissor_rectangles = auxiliary_length(scissor_rectangles.len())?;
        create_with_auxiliary(
            buffer,
            Self {
                number_of_scissor_rectangles,
            },
            bytemuck::cast_slice(scissor_rectangles),
        )
    }

    pub fn create_single(
        buffer: &mut CommandBuffer,
        top_left_x: i32,
        top_left_y: i32,
        bottom_right_x: i32,
        bottom_right_y: i32,
    ) -> Result<(), CommandBufferError> {
        Self::create(
            buffer,
            &[ScissorRectangle {
                top_left_x,
                top_left_y,
                bottom_right_x,
                bottom_right_y,
            }],
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsRenderTarget {
    pub render_target: ResourceHandle,
}

impl Command for SetGraphicsRenderTarget {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetGraphicsRenderTarget;
}

impl SetGraphicsRenderTarget {
    pub fn create(buffer: &mut CommandBuffer, render_target: ResourceHandle) -> Result<(), CommandBufferError> {
        check_optional_resource(render_target, "render target", ResourceType::is_render_target)?;
        create_fixed(buffer, Self { render_target })
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ClearGraphics {
    /// Raw [`ClearFlags`]
    pub flags: u32,
    pub color: [f32; 4],
    pub z: f32,
    pub stencil: u32,
}

impl Command for ClearGraphics {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::ClearGraphics;
}

impl ClearGraphics {
    pub fn create(
        buffer: &mut CommandBuffer,
        flags: ClearFlags,
        color: [f32; 4],
        z: f32,
        stencil: u32,
    ) -> Result<(), CommandBufferError> {
        if flags.is_empty() {
            return Err(invalid("clear flags must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&z) {
            return Err(invalid(format!("clear depth {} is outside [0, 1]", z)));
        }
        create_fixed(
            buffer,
            Self {
                flags: flags.bits(),
                color,
                z,
                stencil,
            },
        )
    }

    pub fn clear_flags(&self) -> ClearFlags {
        ClearFlags::from_bits_truncate(self.flags)
    }
}

/// Either reads `number_of_draws` entries from `indirect_buffer`, or, with a
/// null indirect buffer, one [`DrawArguments`] from auxiliary memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawGraphics {
    pub indirect_buffer: ResourceHandle,
    pub indirect_buffer_offset: u32,
    pub number_of_draws: u32,
}

impl Command for DrawGraphics {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::DrawGraphics;
}

impl DrawGraphics {
    pub fn create_indirect(
        buffer: &mut CommandBuffer,
        indirect_buffer: ResourceHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) -> Result<(), CommandBufferError> {
        check_resource(indirect_buffer, "indirect buffer", |t| t == ResourceType::IndirectBuffer)?;
        if number_of_draws == 0 {
            return Err(invalid("number of draws must not be zero".to_string()));
        }
        create_fixed(
            buffer,
            Self {
                indirect_buffer,
                indirect_buffer_offset,
                number_of_draws,
            },
        )
    }

    /// One instance starting at vertex zero.
    pub fn create(buffer: &mut CommandBuffer, vertex_count_per_instance: u32) -> Result<(), CommandBufferError> {
        Self::create_with_arguments(buffer, DrawArguments::new(vertex_count_per_instance))
    }

    pub fn create_with_arguments(
        buffer: &mut CommandBuffer,
        arguments: DrawArguments,
    ) -> Result<(), CommandBufferError> {
        create_with_auxiliary(
            buffer,
            Self {
                indirect_buffer: ResourceHandle::null(),
                indirect_buffer_offset: 0,
                number_of_draws: 1,
            },
            bytemuck::bytes_of(&arguments),
        )
    }

    pub fn is_indirect(&self) -> bool {
        !self.indirect_buffer.is_null()
    }
}

/// Indexed counterpart of [`DrawGraphics`], inline arguments are [`DrawIndexedArguments`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedGraphics {
    pub indirect_buffer: ResourceHandle,
    pub indirect_buffer_offset: u32,
    pub number_of_draws: u32,
}

impl Command for DrawIndexedGraphics {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::DrawIndexedGraphics;
}

impl DrawIndexedGraphics {
    pub fn create_indirect(
        buffer: &mut CommandBuffer,
        indirect_buffer: ResourceHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) -> Result<(), CommandBufferError> {
        check_resource(indirect_buffer, "indirect buffer", |t| t == ResourceType::IndirectBuffer)?;
        if number_of_draws == 0 {
            return Err(invalid("number of draws must not be zero".to_string()));
        }
        create_fixed(
            buffer,
            Self {
                indirect_buffer,
                indirect_buffer_offset,
                number_of_draws,
            },
        )
    }

    pub fn create(buffer: &mut CommandBuffer, index_count_per_instance: u32) -> Result<(), CommandBufferError> {
        Self::create_with_arguments(buffer, DrawIndexedArguments::new(index_count_per_instance))
    }

    pub fn create_with_arguments(
        buffer: &mut CommandBuffer,
        arguments: DrawIndexedArguments,
    ) -> Result<(), CommandBufferError> {
        create_with_auxiliary(
            buffer,
            Self {
                indirect_buffer: ResourceHandle::null(),
                indirect_buffer_offset: 0,
                number_of_draws: 1,
            },
            bytemuck::bytes_of(&arguments),
        )
    }

    pub fn is_indirect(&self) -> bool {
        !self.indirect_buffer.is_null()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawMeshTasks {
    pub indirect_buffer: ResourceHandle,
    pub indirect_buffer_offset: u32,
    pub number_of_draws: u32,
}

impl Command for DrawMeshTasks {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::DrawMeshTasks;
}

impl DrawMeshTasks {
    pub fn create_indirect(
        buffer: &mut CommandBuffer,
        indirect_buffer: ResourceHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) -> Result<(), CommandBufferError> {
        check_resource(indirect_buffer, "indirect buffer", |t| t == ResourceType::IndirectBuffer)?;
        if number_of_draws == 0 {
            return Err(invalid("number of draws must not be zero".to_string()));
        }
        create_fixed(
            buffer,
            Self {
                indirect_buffer,
                indirect_buffer_offset,
                number_of_draws,
            },
        )
    }

    /// Starts at task zero.
    pub fn create(buffer: &mut CommandBuffer, number_of_tasks: u32) -> Result<(), CommandBufferError> {
        Self::create_with_arguments(
            buffer,
            DrawMeshTasksArguments {
                number_of_tasks,
                first_task: 0,
            },
        )
    }

    pub fn create_with_arguments(
        buffer: &mut CommandBuffer,
        arguments: DrawMeshTasksArguments,
    ) -> Result<(), CommandBufferError> {
        if arguments.number_of_tasks == 0 {
            return Err(invalid("number of tasks must not be zero".to_string()));
        }
        create_with_auxiliary(
            buffer,
            Self {
                indirect_buffer: ResourceHandle::null(),
                indirect_buffer_offset: 0,
                number_of_draws: 1,
            },
            bytemuck::bytes_of(&arguments),
        )
    }

    pub fn is_indirect(&self) -> bool {
        !self.indirect_buffer.is_null()
    }
}

// ── Compute ─────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetComputeRootSignature {
    pub root_signature: ResourceHandle,
}

impl Command for SetComputeRootSignature {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetComputeRootSignature;
}

impl SetComputeRootSignature {
    pub fn create(buffer: &mut CommandBuffer, root_signature: ResourceHandle) -> Result<(), CommandBufferError> {
        check_optional_resource(root_signature, "compute root signature", |t| {
            t == ResourceType::RootSignature
        })?;
        create_fixed(buffer, Self { root_signature })
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetComputePipelineState {
    pub compute_pipeline_state: ResourceHandle,
}

impl Command for SetComputePipelineState {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetComputePipelineState;
}

impl SetComputePipelineState {
    pub fn create(
        buffer: &mut CommandBuffer,
        compute_pipeline_state: ResourceHandle,
    ) -> Result<(), CommandBufferError> {
        check_optional_resource(compute_pipeline_state, "compute pipeline state", |t| {
            t == ResourceType::ComputePipelineState
        })?;
        create_fixed(buffer, Self { compute_pipeline_state })
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetComputeResourceGroup {
    pub resource_group: ResourceHandle,
    pub root_parameter_index: u32,
    reserved: u32,
}

impl Command for SetComputeResourceGroup {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetComputeResourceGroup;
}

impl SetComputeResourceGroup {
    pub fn create(
        buffer: &mut CommandBuffer,
        root_parameter_index: u32,
        resource_group: ResourceHandle,
    ) -> Result<(), CommandBufferError> {
        check_optional_resource(resource_group, "compute resource group", |t| {
            t == ResourceType::ResourceGroup
        })?;
        create_fixed(
            buffer,
            Self {
                resource_group,
                root_parameter_index,
                reserved: 0,
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DispatchCompute {
    pub group_count_x: u32,
    pub group_count_y: u32,
    pub group_count_z: u32,
}

impl Command for DispatchCompute {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::DispatchCompute;
}

impl DispatchCompute {
    pub fn create(
        buffer: &mut CommandBuffer,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) -> Result<(), CommandBufferError> {
        create_fixed(
            buffer,
            Self {
                group_count_x,
                group_count_y,
                group_count_z,
            },
        )
    }
}

// ── Resource ────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetTextureMinimumMaximumMipmapIndex {
    pub texture: ResourceHandle,
    pub minimum_mipmap_index: u32,
    pub maximum_mipmap_index: u32,
}

impl Command for SetTextureMinimumMaximumMipmapIndex {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::SetTextureMinimumMaximumMipmapIndex;
}

impl SetTextureMinimumMaximumMipmapIndex {
    pub fn create(
        buffer: &mut CommandBuffer,
        texture: ResourceHandle,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    ) -> Result<(), CommandBufferError> {
        check_resource(texture, "texture", ResourceType::is_texture)?;
        if minimum_mipmap_index > maximum_mipmap_index {
            return Err(invalid(format!(
                "minimum mipmap index {} is above maximum {}",
                minimum_mipmap_index, maximum_mipmap_index
            )));
        }
        create_fixed(
            buffer,
            Self {
                texture,
                minimum_mipmap_index,
                maximum_mipmap_index,
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ResolveMultisampleFramebuffer {
    pub destination_render_target: ResourceHandle,
    pub source_multisample_framebuffer: ResourceHandle,
}

impl Command for ResolveMultisampleFramebuffer {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::ResolveMultisampleFramebuffer;
}

impl ResolveMultisampleFramebuffer {
    pub fn create(
        buffer: &mut CommandBuffer,
        destination_render_target: ResourceHandle,
        source_multisample_framebuffer: ResourceHandle,
    ) -> Result<(), CommandBufferError> {
        check_resource(
            destination_render_target,
            "resolve destination",
            ResourceType::is_render_target,
        )?;
        check_resource(source_multisample_framebuffer, "resolve source", |t| {
            t == ResourceType::Framebuffer
        })?;
        create_fixed(
            buffer,
            Self {
                destination_render_target,
                source_multisample_framebuffer,
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CopyResource {
    pub destination_resource: ResourceHandle,
    pub source_resource: ResourceHandle,
}

impl Command for CopyResource {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::CopyResource;
}

impl CopyResource {
    /// Both resources must be of the same type.
    pub fn create(
        buffer: &mut CommandBuffer,
        destination_resource: ResourceHandle,
        source_resource: ResourceHandle,
    ) -> Result<(), CommandBufferError> {
        check_resource(destination_resource, "copy destination", |t| t != ResourceType::None)?;
        check_resource(source_resource, "copy source", |t| t != ResourceType::None)?;
        if destination_resource.resource_type != source_resource.resource_type {
            return Err(invalid(format!(
                "cannot copy {:?} into {:?}",
                source_resource.resource_type(),
                destination_resource.resource_type()
            )));
        }
        create_fixed(
            buffer,
            Self {
                destination_resource,
                source_resource,
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct GenerateMipmaps {
    pub resource: ResourceHandle,
}

impl Command for GenerateMipmaps {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::GenerateMipmaps;
}

impl GenerateMipmaps {
    pub fn create(buffer: &mut CommandBuffer, resource: ResourceHandle) -> Result<(), CommandBufferError> {
        check_resource(resource, "mipmap source", ResourceType::is_texture)?;
        create_fixed(buffer, Self { resource })
    }
}

/// The uniform data itself is stored verbatim in auxiliary memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CopyUniformBufferData {
    pub uniform_buffer: ResourceHandle,
}

impl Command for CopyUniformBufferData {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::CopyUniformBufferData;
}

impl CopyUniformBufferData {
    pub fn create(
        buffer: &mut CommandBuffer,
        uniform_buffer: ResourceHandle,
        data: &[u8],
    ) -> Result<(), CommandBufferError> {
        check_resource(uniform_buffer, "uniform buffer", |t| t == ResourceType::UniformBuffer)?;
        if data.is_empty() {
            return Err(invalid("uniform buffer data must not be empty".to_string()));
        }
        create_with_auxiliary(buffer, Self { uniform_buffer }, data)
    }
}

// ── Query ───────────────────────────────────────────────────

fn check_query_pool(query_pool: ResourceHandle) -> Result<(), CommandBufferError> {
    check_resource(query_pool, "query pool", |t| t == ResourceType::QueryPool)
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ResetQueryPool {
    pub query_pool: ResourceHandle,
    pub first_query_index: u32,
    pub number_of_queries: u32,
}

impl Command for ResetQueryPool {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::ResetQueryPool;
}

impl ResetQueryPool {
    pub fn create(
        buffer: &mut CommandBuffer,
        query_pool: ResourceHandle,
        first_query_index: u32,
        number_of_queries: u32,
    ) -> Result<(), CommandBufferError> {
        check_query_pool(query_pool)?;
        if number_of_queries == 0 {
            return Err(invalid("number of queries must not be zero".to_string()));
        }
        create_fixed(
            buffer,
            Self {
                query_pool,
                first_query_index,
                number_of_queries,
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BeginQuery {
    pub query_pool: ResourceHandle,
    pub query_index: u32,
    /// Raw [`QueryControlFlags`]
    pub query_control_flags: u32,
}

impl Command for BeginQuery {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::BeginQuery;
}

impl BeginQuery {
    pub fn create(
        buffer: &mut CommandBuffer,
        query_pool: ResourceHandle,
        query_index: u32,
        query_control_flags: QueryControlFlags,
    ) -> Result<(), CommandBufferError> {
        check_query_pool(query_pool)?;
        create_fixed(
            buffer,
            Self {
                query_pool,
                query_index,
                query_control_flags: query_control_flags.bits(),
            },
        )
    }

    pub fn control_flags(&self) -> QueryControlFlags {
        QueryControlFlags::from_bits_truncate(self.query_control_flags)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct EndQuery {
    pub query_pool: ResourceHandle,
    pub query_index: u32,
    reserved: u32,
}

impl Command for EndQuery {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::EndQuery;
}

impl EndQuery {
    pub fn create(
        buffer: &mut CommandBuffer,
        query_pool: ResourceHandle,
        query_index: u32,
    ) -> Result<(), CommandBufferError> {
        check_query_pool(query_pool)?;
        create_fixed(
            buffer,
            Self {
                query_pool,
                query_index,
                reserved: 0,
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct WriteTimestampQuery {
    pub query_pool: ResourceHandle,
    pub query_index: u32,
    reserved: u32,
}

impl Command for WriteTimestampQuery {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
        CommandDispatchFunctionIndex::WriteTimestampQuery;
}

impl WriteTimestampQuery {
    pub fn create(
        buffer: &mut CommandBuffer,
        query_pool: ResourceHandle,
        query_index: u32,
    ) -> Result<(), CommandBufferError> {
        check_query_pool(query_pool)?;
        create_fixed(
            buffer,
            Self {
                query_pool,
                query_index,
                reserved: 0,
            },
        )
    }
}

// ── Debug ───────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetDebugMarker {
    pub name: [u8; DEBUG_NAME_LENGTH],
}

impl Command for SetDebugMarker {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::SetDebugMarker;
}

impl SetDebugMarker {
    /// Names longer than 127 bytes are truncated.
    pub fn create(buffer: &mut CommandBuffer, name: &str) -> Result<(), CommandBufferError> {
        create_fixed(
            buffer,
            Self {
                name: encode_debug_name(name),
            },
        )
    }

    pub fn name(&self) -> &str {
        decode_debug_name(&self.name)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BeginDebugEvent {
    pub name: [u8; DEBUG_NAME_LENGTH],
}

impl Command for BeginDebugEvent {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::BeginDebugEvent;
}

impl BeginDebugEvent {
    /// Names longer than 127 bytes are truncated.
    pub fn create(buffer: &mut CommandBuffer, name: &str) -> Result<(), CommandBufferError> {
        create_fixed(
            buffer,
            Self {
                name: encode_debug_name(name),
            },
        )
    }

    pub fn name(&self) -> &str {
        decode_debug_name(&self.name)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndDebugEvent;

// SAFETY: zero-sized, every (empty) bit pattern is valid.
unsafe impl Zeroable for EndDebugEvent {}
unsafe impl Pod for EndDebugEvent {}

impl Command for EndDebugEvent {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex = CommandDispatchFunctionIndex::EndDebugEvent;
}

impl EndDebugEvent {
    pub fn create(buffer: &mut CommandBuffer) -> Result<(), CommandBufferError> {
        create_fixed(buffer, Self)
    }
}

/// Size of the fixed fields for each dispatch index, in table order.
pub fn command_size(index: CommandDispatchFunctionIndex) -> usize {
    use CommandDispatchFunctionIndex as I;
    match index {
        I::SetGraphicsRootSignature => mem::size_of::<SetGraphicsRootSignature>(),
        I::SetGraphicsPipelineState => mem::size_of::<SetGraphicsPipelineState>(),
        I::SetGraphicsResourceGroup => mem::size_of::<SetGraphicsResourceGroup>(),
        I::SetGraphicsVertexArray => mem::size_of::<SetGraphicsVertexArray>(),
        I::SetGraphicsViewports => mem::size_of::<SetGraphicsViewports>(),
        I::SetGraphicsScissorRectangles => mem::size_of::<SetGraphicsScissorRectangles>(),
        I::SetGraphicsRenderTarget => mem::size_of::<SetGraphicsRenderTarget>(),
        I::ClearGraphics => mem::size_of::<ClearGraphics>(),
        I::DrawGraphics => mem::size_of::<DrawGraphics>(),
        I::DrawIndexedGraphics => mem::size_of::<DrawIndexedGraphics>(),
        I::DrawMeshTasks => mem::size_of::<DrawMeshTasks>(),
        I::SetComputeRootSignature => mem::size_of::<SetComputeRootSignature>(),
        I::SetComputePipelineState => mem::size_of::<SetComputePipelineState>(),
        I::SetComputeResourceGroup => mem::size_of::<SetComputeResourceGroup>(),
        I::DispatchCompute => mem::size_of::<DispatchCompute>(),
        I::SetTextureMinimumMaximumMipmapIndex => mem::size_of::<SetTextureMinimumMaximumMipmapIndex>(),
        I::ResolveMultisampleFramebuffer => mem::size_of::<ResolveMultisampleFramebuffer>(),
        I::CopyResource => mem::size_of::<CopyResource>(),
        I::GenerateMipmaps => mem::size_of::<GenerateMipmaps>(),
        I::CopyUniformBufferData => mem::size_of::<CopyUniformBufferData>(),
        I::ResetQueryPool => mem::size_of::<ResetQueryPool>(),
        I::BeginQuery => mem::size_of::<BeginQuery>(),
        I::EndQuery => mem::size_of::<EndQuery>(),
        I::WriteTimestampQuery => mem::size_of::<WriteTimestampQuery>(),
        I::SetDebugMarker => mem::size_of::<SetDebugMarker>(),
        I::BeginDebugEvent => mem::size_of::<BeginDebugEvent>(),
        I::EndDebugEvent => mem::size_of::<EndDebugEvent>(),
    }
}
