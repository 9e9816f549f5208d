use bytemuck::{Pod, Zeroable};

/// A non-owning reference to a backend resource.
/// Commands only store these; the caller keeps the resource alive until the
/// command buffer has been dispatched.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct ResourceHandle {
    /// Unique resource identifier, 0 for the null handle
    pub resource_id: u64,
    /// Raw [`ResourceType`] tag
    pub resource_type: u32,
    reserved: u32,
}

impl ResourceHandle {
    pub const fn new(resource_id: u64, resource_type: ResourceType) -> Self {
        Self {
            resource_id,
            resource_type: resource_type as u32,
            reserved: 0,
        }
    }

    /// Create a null/invalid handle.
    pub const fn null() -> Self {
        Self::new(0, ResourceType::None)
    }

    pub fn is_null(&self) -> bool {
        self.resource_type == ResourceType::None as u32 && self.resource_id == 0
    }

    /// Decoded type tag, `None` if the raw tag is unknown.
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::from_raw(self.resource_type)
    }
}

impl Default for ResourceHandle {
    fn default() -> Self {
        Self::null()
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    None,

    // Binding
    RootSignature,
    ResourceGroup,
    VertexArray,
    QueryPool,

    // Render targets
    SwapChain,
    Framebuffer,

    // Buffers
    VertexBuffer,
    IndexBuffer,
    TextureBuffer,
    StructuredBuffer,
    IndirectBuffer,
    UniformBuffer,

    // Textures
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture3D,
    TextureCube,
    TextureCubeArray,

    // States
    GraphicsPipelineState,
    ComputePipelineState,
    SamplerState,
}

impl ResourceType {
    pub const ALL: [ResourceType; 23] = [
        ResourceType::None,
        ResourceType::RootSignature,
        ResourceType::ResourceGroup,
        ResourceType::VertexArray,
        ResourceType::QueryPool,
        ResourceType::SwapChain,
        ResourceType::Framebuffer,
        ResourceType::VertexBuffer,
        ResourceType::IndexBuffer,
        ResourceType::TextureBuffer,
        ResourceType::StructuredBuffer,
        ResourceType::IndirectBuffer,
        ResourceType::UniformBuffer,
        ResourceType::Texture1D,
        ResourceType::Texture1DArray,
        ResourceType::Texture2D,
        ResourceType::Texture2DArray,
        ResourceType::Texture3D,
        ResourceType::TextureCube,
        ResourceType::TextureCubeArray,
        ResourceType::GraphicsPipelineState,
        ResourceType::ComputePipelineState,
        ResourceType::SamplerState,
    ];

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    pub fn is_render_target(self) -> bool {
        matches!(self, ResourceType::SwapChain | ResourceType::Framebuffer)
    }

    pub fn is_texture(self) -> bool {
        matches!(
            self,
            ResourceType::Texture1D
                | ResourceType::Texture1DArray
                | ResourceType::Texture2D
                | ResourceType::Texture2DArray
                | ResourceType::Texture3D
                | ResourceType::TextureCube
                | ResourceType::TextureCubeArray
        )
    }

    pub fn is_buffer(self) -> bool {
        matches!(
            self,
            ResourceType::VertexBuffer
                | ResourceType::IndexBuffer
                | ResourceType::TextureBuffer
                | ResourceType::StructuredBuffer
                | ResourceType::IndirectBuffer
                | ResourceType::UniformBuffer
        )
    }
}
