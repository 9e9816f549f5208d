//! Dispatch enumeration and the backend integration point.
//!
//! A backend provides one plain function per command kind, stored in a table
//! indexed by [`CommandDispatchFunctionIndex`]. Submission walks the packet
//! chain and calls `table[index](packet, backend)`; no per-command allocation
//! and no virtual call is involved.

use bytemuck::Pod;

use crate::buffer::CommandBuffer;
use crate::error::CommandBufferError;
use crate::packet::CommandPacket;

/// Number of entries every backend dispatch table must have.
pub const NUMBER_OF_FUNCTIONS: usize = 27;

/// One tag per command kind. Append-only: backends rely on the order.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandDispatchFunctionIndex {
    // Graphics
    SetGraphicsRootSignature,
    SetGraphicsPipelineState,
    SetGraphicsResourceGroup,
    SetGraphicsVertexArray,
    SetGraphicsViewports,
    SetGraphicsScissorRectangles,
    SetGraphicsRenderTarget,
    ClearGraphics,
    DrawGraphics,
    DrawIndexedGraphics,
    DrawMeshTasks,
    // Compute
    SetComputeRootSignature,
    SetComputePipelineState,
    SetComputeResourceGroup,
    DispatchCompute,
    // Resource
    SetTextureMinimumMaximumMipmapIndex,
    ResolveMultisampleFramebuffer,
    CopyResource,
    GenerateMipmaps,
    CopyUniformBufferData,
    // Query
    ResetQueryPool,
    BeginQuery,
    EndQuery,
    WriteTimestampQuery,
    // Debug
    SetDebugMarker,
    BeginDebugEvent,
    EndDebugEvent,
}

impl CommandDispatchFunctionIndex {
    pub const ALL: [CommandDispatchFunctionIndex; NUMBER_OF_FUNCTIONS] = [
        Self::SetGraphicsRootSignature,
        Self::SetGraphicsPipelineState,
        Self::SetGraphicsResourceGroup,
        Self::SetGraphicsVertexArray,
        Self::SetGraphicsViewports,
        Self::SetGraphicsScissorRectangles,
        Self::SetGraphicsRenderTarget,
        Self::ClearGraphics,
        Self::DrawGraphics,
        Self::DrawIndexedGraphics,
        Self::DrawMeshTasks,
        Self::SetComputeRootSignature,
        Self::SetComputePipelineState,
        Self::SetComputeResourceGroup,
        Self::DispatchCompute,
        Self::SetTextureMinimumMaximumMipmapIndex,
        Self::ResolveMultisampleFramebuffer,
        Self::CopyResource,
        Self::GenerateMipmaps,
        Self::CopyUniformBufferData,
        Self::ResetQueryPool,
        Self::BeginQuery,
        Self::EndQuery,
        Self::WriteTimestampQuery,
        Self::SetDebugMarker,
        Self::BeginDebugEvent,
        Self::EndDebugEvent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SetGraphicsRootSignature => "SetGraphicsRootSignature",
            Self::SetGraphicsPipelineState => "SetGraphicsPipelineState",
            Self::SetGraphicsResourceGroup => "SetGraphicsResourceGroup",
            Self::SetGraphicsVertexArray => "SetGraphicsVertexArray",
            Self::SetGraphicsViewports => "SetGraphicsViewports",
            Self::SetGraphicsScissorRectangles => "SetGraphicsScissorRectangles",
            Self::SetGraphicsRenderTarget => "SetGraphicsRenderTarget",
            Self::ClearGraphics => "ClearGraphics",
            Self::DrawGraphics => "DrawGraphics",
            Self::DrawIndexedGraphics => "DrawIndexedGraphics",
            Self::DrawMeshTasks => "DrawMeshTasks",
            Self::SetComputeRootSignature => "SetComputeRootSignature",
            Self::SetComputePipelineState => "SetComputePipelineState",
            Self::SetComputeResourceGroup => "SetComputeResourceGroup",
            Self::DispatchCompute => "DispatchCompute",
            Self::SetTextureMinimumMaximumMipmapIndex => "SetTextureMinimumMaximumMipmapIndex",
            Self::ResolveMultisampleFramebuffer => "ResolveMultisampleFramebuffer",
            Self::CopyResource => "CopyResource",
            Self::GenerateMipmaps => "GenerateMipmaps",
            Self::CopyUniformBufferData => "CopyUniformBufferData",
            Self::ResetQueryPool => "ResetQueryPool",
            Self::BeginQuery => "BeginQuery",
            Self::EndQuery => "EndQuery",
            Self::WriteTimestampQuery => "WriteTimestampQuery",
            Self::SetDebugMarker => "SetDebugMarker",
            Self::BeginDebugEvent => "BeginDebugEvent",
            Self::EndDebugEvent => "EndDebugEvent",
        }
    }
}

impl TryFrom<u32> for CommandDispatchFunctionIndex {
    type Error = CommandBufferError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(CommandBufferError::UnknownDispatchIndex(raw))
    }
}

/// Fixed fields of one command kind.
pub trait Command: Pod {
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex;
}

/// Handler for one command kind. Reads the packet's fields with
/// [`CommandPacket::fields`] for the type matching its table slot.
pub type DispatchFunction<R> = fn(&CommandPacket<'_>, &mut R);

pub type DispatchTable<R> = [DispatchFunction<R>; NUMBER_OF_FUNCTIONS];

/// A backend commands can be dispatched to.
pub trait Rhi: Sized + 'static {
    /// Handlers in [`CommandDispatchFunctionIndex`] order.
    fn dispatch_table() -> &'static DispatchTable<Self>;

    /// Execute a recorded command buffer.
    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) {
        command_buffer.dispatch_to_rhi(self);
    }
}
