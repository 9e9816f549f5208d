//! Integration test: NullRhi
//!
//! Records command buffers against resources registered with the null
//! backend and checks bound state, statistics and the skipping of commands
//! that reference invalid resources.
//!
//! Run with: cargo test --test null_rhi_test -- --nocapture

use rhi_command::commands::*;
use rhi_command::{CommandBuffer, CommandDispatchFunctionIndex, ResourceHandle, ResourceType, Rhi};
use rhi_core::config::NullBackendConfig;
use rhi_null::NullRhi;

struct Scene {
    root_signature: ResourceHandle,
    pipeline: ResourceHandle,
    resource_group: ResourceHandle,
    vertex_array: ResourceHandle,
    framebuffer: ResourceHandle,
    uniform_buffer: ResourceHandle,
    query_pool: ResourceHandle,
}

fn make_rhi() -> NullRhi {
    rhi_common::try_init_logging("warn");
    NullRhi::new(NullBackendConfig::default())
}

fn make_scene(rhi: &NullRhi) -> Scene {
    Scene {
        root_signature: rhi.create_resource(ResourceType::RootSignature, "root signature"),
        pipeline: rhi.create_resource(ResourceType::GraphicsPipelineState, "opaque pipeline"),
        resource_group: rhi.create_resource(ResourceType::ResourceGroup, "material group"),
        vertex_array: rhi.create_resource(ResourceType::VertexArray, "mesh"),
        framebuffer: rhi.create_resource(ResourceType::Framebuffer, "scene color"),
        uniform_buffer: rhi.create_resource(ResourceType::UniformBuffer, "per-frame constants"),
        query_pool: rhi.create_resource(ResourceType::QueryPool, "occlusion"),
    }
}

fn record_frame(buffer: &mut CommandBuffer, scene: &Scene) {
    BeginDebugEvent::create(buffer, "frame").expect("begin event");
    SetGraphicsRenderTarget::create(buffer, scene.framebuffer).expect("render target");
    SetGraphicsViewports::create_single(buffer, 0.0, 0.0, 1280.0, 720.0).expect("viewport");
    SetGraphicsScissorRectangles::create_single(buffer, 0, 0, 1280, 720).expect("scissor");
    ClearGraphics::create(buffer, ClearFlags::COLOR_DEPTH, [0.5, 0.5, 0.5, 1.0], 1.0, 0).expect("clear");
    SetGraphicsRootSignature::create(buffer, scene.root_signature).expect("root signature");
    SetGraphicsPipelineState::create(buffer, scene.pipeline).expect("pipeline");
    SetGraphicsResourceGroup::create(buffer, 0, scene.resource_group).expect("resource group");
    SetGraphicsVertexArray::create(buffer, scene.vertex_array).expect("vertex array");
    CopyUniformBufferData::create(buffer, scene.uniform_buffer, &[0u8; 64]).expect("uniforms");
    BeginQuery::create(buffer, scene.query_pool, 0, QueryControlFlags::empty()).expect("begin query");
    DrawIndexedGraphics::create_with_arguments(
        buffer,
        DrawIndexedArguments {
            instance_count: 4,
            ..DrawIndexedArguments::new(36)
        },
    )
    .expect("indexed draw");
    EndQuery::create(buffer, scene.query_pool, 0).expect("end query");
    DrawGraphics::create(buffer, 3).expect("draw");
    SetDebugMarker::create(buffer, "opaque done").expect("marker");
    EndDebugEvent::create(buffer).expect("end event");
}

#[test]
fn test_replay_frame_statistics() {
    let mut rhi = make_rhi();
    let scene = make_scene(&rhi);
    let mut buffer = CommandBuffer::new();
    record_frame(&mut buffer, &scene);

    rhi.submit_command_buffer(&buffer);
    let stats = rhi.statistics();
    println!("{}", stats);

    assert_eq!(stats.commands, 16);
    assert_eq!(stats.skipped_commands, 0);
    assert_eq!(stats.clears, 1);
    assert_eq!(stats.draws, 1);
    assert_eq!(stats.indexed_draws, 1);
    assert_eq!(stats.instances, 5);
    assert_eq!(stats.uniform_bytes, 64);
    assert_eq!(stats.queries, 1);
    assert_eq!(stats.debug_markers, 1);
    assert_eq!(stats.invocations(CommandDispatchFunctionIndex::DrawGraphics), 1);
    assert_eq!(stats.invocations(CommandDispatchFunctionIndex::DispatchCompute), 0);
}

#[test]
fn test_replay_frame_bound_state() {
    let mut rhi = make_rhi();
    let scene = make_scene(&rhi);
    let mut buffer = CommandBuffer::new();
    record_frame(&mut buffer, &scene);
    rhi.submit_command_buffer(&buffer);

    let state = rhi.state();
    assert_eq!(state.render_target, scene.framebuffer);
    assert_eq!(state.graphics_root_signature, scene.root_signature);
    assert_eq!(state.graphics_pipeline_state, scene.pipeline);
    assert_eq!(state.graphics_resource_groups.get(&0), Some(&scene.resource_group));
    assert_eq!(state.vertex_array, scene.vertex_array);
    assert_eq!(state.viewports.len(), 1);
    assert_eq!(state.viewports[0].width, 1280.0);
    assert_eq!(state.viewports[0].max_depth, 1.0);
    assert_eq!(state.scissor_rectangles[0].bottom_right_y, 720);
    assert!(state.open_queries.is_empty());
    assert_eq!(state.debug_event_depth, 0);
    assert_eq!(state.last_debug_marker.as_deref(), Some("opaque done"));
}

#[test]
fn test_record_once_replay_many() {
    let mut rhi = make_rhi();
    let scene = make_scene(&rhi);
    let mut buffer = CommandBuffer::new();
    record_frame(&mut buffer, &scene);

    for _ in 0..3 {
        rhi.submit_command_buffer(&buffer);
        rhi.reset_state();
    }
    assert_eq!(rhi.statistics().commands, 48);
    assert_eq!(rhi.statistics().indexed_draws, 3);
    assert_eq!(buffer.number_of_commands(), 16);

    rhi.reset_statistics();
    buffer.dispatch_to_rhi_and_clear(&mut rhi);
    assert_eq!(rhi.statistics().commands, 16);
    assert!(buffer.is_empty());
}

#[test]
fn test_destroyed_resource_is_skipped() {
    let mut rhi = make_rhi();
    let scene = make_scene(&rhi);
    let mut buffer = CommandBuffer::new();
    SetGraphicsRenderTarget::create(&mut buffer, scene.framebuffer).expect("render target");
    CopyUniformBufferData::create(&mut buffer, scene.uniform_buffer, &[1, 2, 3, 4]).expect("uniforms");

    assert!(rhi.destroy_resource(&scene.uniform_buffer));
    rhi.submit_command_buffer(&buffer);

    let stats = rhi.statistics();
    assert_eq!(stats.commands, 2);
    assert_eq!(stats.skipped_commands, 1);
    assert_eq!(stats.uniform_bytes, 0);
    assert_eq!(rhi.state().render_target, scene.framebuffer);
}

#[test]
fn test_unregistered_handle_is_skipped() {
    let mut rhi = make_rhi();
    let mut buffer = CommandBuffer::new();
    let stray = ResourceHandle::new(999, ResourceType::RootSignature);
    SetGraphicsRootSignature::create(&mut buffer, stray).expect("recorded");

    rhi.submit_command_buffer(&buffer);
    assert_eq!(rhi.statistics().skipped_commands, 1);
    assert!(rhi.state().graphics_root_signature.is_null());
}

#[test]
fn test_validation_disabled_accepts_everything() {
    let mut rhi = NullRhi::new(NullBackendConfig {
        validate_resources: false,
        log_commands: true,
    });
    let mut buffer = CommandBuffer::new();
    let stray = ResourceHandle::new(999, ResourceType::RootSignature);
    SetGraphicsRootSignature::create(&mut buffer, stray).expect("recorded");
    ClearGraphics::create(&mut buffer, ClearFlags::COLOR, [0.0; 4], 1.0, 0).expect("recorded");

    rhi.submit_command_buffer(&buffer);
    assert_eq!(rhi.statistics().skipped_commands, 0);
    assert_eq!(rhi.statistics().clears, 1);
    assert_eq!(rhi.state().graphics_root_signature, stray);
}

#[test]
fn test_commands_need_bound_state() {
    let mut rhi = make_rhi();
    let mut buffer = CommandBuffer::new();
    ClearGraphics::create(&mut buffer, ClearFlags::COLOR, [0.0; 4], 1.0, 0).expect("recorded");
    DrawGraphics::create(&mut buffer, 3).expect("recorded");
    DispatchCompute::create(&mut buffer, 8, 8, 1).expect("recorded");

    rhi.submit_command_buffer(&buffer);
    let stats = rhi.statistics();
    assert_eq!(stats.commands, 3);
    assert_eq!(stats.skipped_commands, 3);
    assert_eq!(stats.clears, 0);
    assert_eq!(stats.draws, 0);
    assert_eq!(stats.dispatches, 0);
}

#[test]
fn test_compute_dispatch() {
    let mut rhi = make_rhi();
    let root_signature = rhi.create_resource(ResourceType::RootSignature, "compute root");
    let pipeline = rhi.create_resource(ResourceType::ComputePipelineState, "blur");
    let group = rhi.create_resource(ResourceType::ResourceGroup, "blur inputs");

    let mut buffer = CommandBuffer::new();
    SetComputeRootSignature::create(&mut buffer, root_signature).expect("root signature");
    SetComputePipelineState::create(&mut buffer, pipeline).expect("pipeline");
    SetComputeResourceGroup::create(&mut buffer, 2, group).expect("group");
    DispatchCompute::create(&mut buffer, 16, 16, 1).expect("dispatch");
    DispatchCompute::create(&mut buffer, 0, 16, 1).expect("empty dispatch");

    rhi.submit_command_buffer(&buffer);
    assert_eq!(rhi.statistics().dispatches, 1);
    assert_eq!(rhi.statistics().skipped_commands, 0);
    assert_eq!(rhi.state().compute_resource_groups.get(&2), Some(&group));

    // Unbinding the group empties the slot
    buffer.clear();
    SetComputeResourceGroup::create(&mut buffer, 2, ResourceHandle::null()).expect("unbind");
    rhi.submit_command_buffer(&buffer);
    assert!(rhi.state().compute_resource_groups.is_empty());
}

#[test]
fn test_query_pairing() {
    let mut rhi = make_rhi();
    let pool = rhi.create_resource(ResourceType::QueryPool, "timestamps");

    let mut buffer = CommandBuffer::new();
    EndQuery::create(&mut buffer, pool, 3).expect("end without begin");
    BeginQuery::create(&mut buffer, pool, 1, QueryControlFlags::PRECISE).expect("begin");
    BeginQuery::create(&mut buffer, pool, 1, QueryControlFlags::PRECISE).expect("begin twice");
    WriteTimestampQuery::create(&mut buffer, pool, 4).expect("timestamp");
    rhi.submit_command_buffer(&buffer);

    assert_eq!(rhi.statistics().skipped_commands, 2);
    assert_eq!(rhi.statistics().timestamps, 1);
    assert!(rhi.state().open_queries.contains(&(pool.resource_id, 1)));

    buffer.clear();
    ResetQueryPool::create(&mut buffer, pool, 0, 2).expect("reset");
    rhi.submit_command_buffer(&buffer);
    assert!(rhi.state().open_queries.is_empty());
}

#[test]
fn test_unbalanced_debug_event_is_skipped() {
    let mut rhi = make_rhi();
    let mut buffer = CommandBuffer::new();
    BeginDebugEvent::create(&mut buffer, "outer").expect("begin");
    BeginDebugEvent::create(&mut buffer, "inner").expect("begin");
    EndDebugEvent::create(&mut buffer).expect("end");
    rhi.submit_command_buffer(&buffer);
    assert_eq!(rhi.state().debug_event_depth, 1);

    buffer.clear();
    EndDebugEvent::create(&mut buffer).expect("end");
    EndDebugEvent::create(&mut buffer).expect("end");
    rhi.submit_command_buffer(&buffer);
    assert_eq!(rhi.state().debug_event_depth, 0);
    assert_eq!(rhi.statistics().skipped_commands, 1);
}

#[test]
fn test_texture_commands() {
    let mut rhi = make_rhi();
    let texture = rhi.create_resource(ResourceType::Texture2D, "albedo");
    let copy = rhi.create_resource(ResourceType::Texture2D, "albedo copy");
    let swap_chain = rhi.create_resource(ResourceType::SwapChain, "window");
    let multisample = rhi.create_resource(ResourceType::Framebuffer, "msaa");

    let mut buffer = CommandBuffer::new();
    SetTextureMinimumMaximumMipmapIndex::create(&mut buffer, texture, 1, 4).expect("mip range");
    GenerateMipmaps::create(&mut buffer, texture).expect("mipmaps");
    CopyResource::create(&mut buffer, copy, texture).expect("copy");
    ResolveMultisampleFramebuffer::create(&mut buffer, swap_chain, multisample).expect("resolve");
    rhi.submit_command_buffer(&buffer);

    assert_eq!(rhi.statistics().skipped_commands, 0);
    assert_eq!(rhi.statistics().copies, 2);
    assert_eq!(rhi.state().mipmap_ranges.get(&texture.resource_id), Some(&(1, 4)));
}

#[test]
fn test_merged_buffers_replay_in_order() {
    let mut rhi = make_rhi();
    let scene = make_scene(&rhi);

    let mut first = CommandBuffer::new();
    SetDebugMarker::create(&mut first, "first").expect("marker");
    let mut second = CommandBuffer::new();
    record_frame(&mut second, &scene);
    SetDebugMarker::create(&mut second, "last").expect("marker");

    second.append_to_command_buffer_and_clear(&mut first).expect("append");
    assert!(second.is_empty());
    assert_eq!(first.number_of_commands(), 18);

    rhi.submit_command_buffer(&first);
    assert_eq!(rhi.statistics().commands, 18);
    assert_eq!(rhi.statistics().debug_markers, 3);
    assert_eq!(rhi.state().last_debug_marker.as_deref(), Some("last"));
}
