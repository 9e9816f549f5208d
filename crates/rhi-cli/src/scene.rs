use rhi_command::commands::*;
use rhi_command::{CommandBuffer, CommandBufferError, ResourceHandle, ResourceType};
use rhi_null::NullRhi;

/// Resources of the demo frame, registered with the backend.
pub struct DemoScene {
    framebuffer: ResourceHandle,
    root_signature: ResourceHandle,
    pipeline: ResourceHandle,
    vertex_array: ResourceHandle,
    query_pool: ResourceHandle,
    material_groups: Vec<ResourceHandle>,
    uniform_buffer: ResourceHandle,
    compute_root_signature: ResourceHandle,
    compute_pipeline: ResourceHandle,
}

const MATERIALS: usize = 4;
const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

impl DemoScene {
    pub fn create(rhi: &NullRhi) -> Self {
        Self {
            framebuffer: rhi.create_resource(ResourceType::Framebuffer, "scene color"),
            root_signature: rhi.create_resource(ResourceType::RootSignature, "scene root signature"),
            pipeline: rhi.create_resource(ResourceType::GraphicsPipelineState, "opaque pipeline"),
            vertex_array: rhi.create_resource(ResourceType::VertexArray, "scene meshes"),
            query_pool: rhi.create_resource(ResourceType::QueryPool, "frame timestamps"),
            material_groups: (0..MATERIALS)
                .map(|i| rhi.create_resource(ResourceType::ResourceGroup, &format!("material {}", i)))
                .collect(),
            uniform_buffer: rhi.create_resource(ResourceType::UniformBuffer, "object constants"),
            compute_root_signature: rhi.create_resource(ResourceType::RootSignature, "post root signature"),
            compute_pipeline: rhi.create_resource(ResourceType::ComputePipelineState, "tone mapping"),
        }
    }

    /// Frame setup, recorded before any worker's objects.
    pub fn record_begin_frame(&self, buffer: &mut CommandBuffer) -> Result<(), CommandBufferError> {
        BeginDebugEvent::create(buffer, "frame")?;
        ResetQueryPool::create(buffer, self.query_pool, 0, 2)?;
        WriteTimestampQuery::create(buffer, self.query_pool, 0)?;
        SetGraphicsRenderTarget::create(buffer, self.framebuffer)?;
        SetGraphicsViewports::create_single(buffer, 0.0, 0.0, WIDTH as f32, HEIGHT as f32)?;
        SetGraphicsScissorRectangles::create_single(buffer, 0, 0, WIDTH as i32, HEIGHT as i32)?;
        ClearGraphics::create(buffer, ClearFlags::COLOR_DEPTH, [0.1, 0.1, 0.1, 1.0], 1.0, 0)?;
        SetGraphicsRootSignature::create(buffer, self.root_signature)?;
        SetGraphicsPipelineState::create(buffer, self.pipeline)?;
        SetGraphicsVertexArray::create(buffer, self.vertex_array)
    }

    /// Draw calls for the objects `first..first + count`.
    pub fn record_objects(
        &self,
        buffer: &mut CommandBuffer,
        worker: usize,
        first: usize,
        count: usize,
    ) -> Result<(), CommandBufferError> {
        SetDebugMarker::create(buffer, &format!("worker {} objects {}..{}", worker, first, first + count))?;
        for object in first..first + count {
            let material = self.material_groups[object % self.material_groups.len()];
            SetGraphicsResourceGroup::create(buffer, 0, material)?;

            let mut constants = [0u8; 64];
            constants[..8].copy_from_slice(&(object as u64).to_le_bytes());
            CopyUniformBufferData::create(buffer, self.uniform_buffer, &constants)?;

            DrawIndexedGraphics::create_with_arguments(
                buffer,
                DrawIndexedArguments {
                    instance_count: 1 + (object % 3) as u32,
                    ..DrawIndexedArguments::new(36)
                },
            )?;
        }
        Ok(())
    }

    /// Post processing and frame end, recorded after the merge.
    pub fn record_end_frame(&self, buffer: &mut CommandBuffer) -> Result<(), CommandBufferError> {
        SetComputeRootSignature::create(buffer, self.compute_root_signature)?;
        SetComputePipelineState::create(buffer, self.compute_pipeline)?;
        DispatchCompute::create(buffer, WIDTH.div_ceil(8), HEIGHT.div_ceil(8), 1)?;
        WriteTimestampQuery::create(buffer, self.query_pool, 1)?;
        EndDebugEvent::create(buffer)
    }
}
