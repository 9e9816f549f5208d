use bytemuck::Pod;
use rhi_command::commands::*;
use rhi_command::{Command, CommandPacket, DispatchTable, ResourceType};
use tracing::trace;

use crate::null_rhi::NullRhi;
use crate::state::bind_resource_group;

/// Handlers in dispatch index order.
pub(crate) static NULL_DISPATCH_TABLE: DispatchTable<NullRhi> = [
    // Graphics
    set_graphics_root_signature,
    set_graphics_pipeline_state,
    set_graphics_resource_group,
    set_graphics_vertex_array,
    set_graphics_viewports,
    set_graphics_scissor_rectangles,
    set_graphics_render_target,
    clear_graphics,
    draw_graphics,
    draw_indexed_graphics,
    draw_mesh_tasks,
    // Compute
    set_compute_root_signature,
    set_compute_pipeline_state,
    set_compute_resource_group,
    dispatch_compute,
    // Resource
    set_texture_minimum_maximum_mipmap_index,
    resolve_multisample_framebuffer,
    copy_resource,
    generate_mipmaps,
    copy_uniform_buffer_data,
    // Query
    reset_query_pool,
    begin_query,
    end_query,
    write_timestamp_query,
    // Debug
    set_debug_marker,
    begin_debug_event,
    end_debug_event,
];

// ── Graphics ────────────────────────────────────────────────

fn set_graphics_root_signature(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetGraphicsRootSignature>();
    if !rhi.require_optional(packet, &command.root_signature, |t| t == ResourceType::RootSignature) {
        return;
    }
    rhi.state.graphics_root_signature = command.root_signature;
    // Changing the root signature invalidates bound groups
    rhi.state.graphics_resource_groups.clear();
}

fn set_graphics_pipeline_state(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetGraphicsPipelineState>();
    if !rhi.require_optional(packet, &command.graphics_pipeline_state, |t| {
        t == ResourceType::GraphicsPipelineState
    }) {
        return;
    }
    rhi.state.graphics_pipeline_state = command.graphics_pipeline_state;
}

fn set_graphics_resource_group(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetGraphicsResourceGroup>();
    if !rhi.require_optional(packet, &command.resource_group, |t| t == ResourceType::ResourceGroup) {
        return;
    }
    if !rhi.require_bound(packet, rhi.state.graphics_root_signature, "graphics root signature") {
        return;
    }
    bind_resource_group(
        &mut rhi.state.graphics_resource_groups,
        command.root_parameter_index,
        command.resource_group,
    );
}

fn set_graphics_vertex_array(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetGraphicsVertexArray>();
    if !rhi.require_optional(packet, &command.vertex_array, |t| t == ResourceType::VertexArray) {
        return;
    }
    rhi.state.vertex_array = command.vertex_array;
}

fn set_graphics_viewports(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetGraphicsViewports>();
    match packet.auxiliary_as::<SetGraphicsViewports, Viewport>() {
        Ok(viewports) if viewports.len() == command.number_of_viewports as usize => {
            rhi.state.viewports = viewports.to_vec();
        }
        Ok(viewports) => {
            rhi.skip(
                packet,
                &format!(
                    "{} viewports recorded, {} stored",
                    command.number_of_viewports,
                    viewports.len()
                ),
            );
        }
        Err(e) => {
            rhi.skip(packet, &e.to_string());
        }
    }
}

fn set_graphics_scissor_rectangles(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetGraphicsScissorRectangles>();
    match packet.auxiliary_as::<SetGraphicsScissorRectangles, ScissorRectangle>() {
        Ok(rectangles) if rectangles.len() == command.number_of_scissor_rectangles as usize => {
            rhi.state.scissor_rectangles = rectangles.to_vec();
        }
        Ok(rectangles) => {
            rhi.skip(
                packet,
                &format!(
                    "{} scissor rectangles recorded, {} stored",
                    command.number_of_scissor_rectangles,
                    rectangles.len()
                ),
            );
        }
        Err(e) => {
            rhi.skip(packet, &e.to_string());
        }
    }
}

fn set_graphics_render_target(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetGraphicsRenderTarget>();
    if !rhi.require_optional(packet, &command.render_target, ResourceType::is_render_target) {
        return;
    }
    rhi.state.render_target = command.render_target;
}

fn clear_graphics(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<ClearGraphics>();
    if command.clear_flags().is_empty() {
        rhi.skip(packet, "nothing to clear");
        return;
    }
    if !rhi.require_bound(packet, rhi.state.render_target, "render target") {
        return;
    }
    rhi.statistics.clears += 1;
}

/// The single argument record stored inline by a non-indirect draw.
fn inline_draw_arguments<T: Command, A: Pod>(packet: &CommandPacket<'_>, rhi: &mut NullRhi) -> Option<A> {
    match packet.auxiliary_as::<T, A>() {
        Ok([arguments]) => Some(*arguments),
        Ok(arguments) => {
            rhi.skip(packet, &format!("expected one inline argument record, found {}", arguments.len()));
            None
        }
        Err(e) => {
            rhi.skip(packet, &e.to_string());
            None
        }
    }
}

fn draw_graphics(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<DrawGraphics>();
    if !rhi.require_bound(packet, rhi.state.graphics_pipeline_state, "graphics pipeline state") {
        return;
    }
    if command.is_indirect() {
        if !rhi.require(packet, &command.indirect_buffer, |t| t == ResourceType::IndirectBuffer) {
            return;
        }
    } else {
        match inline_draw_arguments::<DrawGraphics, DrawArguments>(packet, rhi) {
            Some(arguments) => rhi.statistics.instances += arguments.instance_count as u64,
            None => return,
        }
    }
    rhi.statistics.draws += command.number_of_draws as u64;
}

fn draw_indexed_graphics(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<DrawIndexedGraphics>();
    if !rhi.require_bound(packet, rhi.state.graphics_pipeline_state, "graphics pipeline state") {
        return;
    }
    if !rhi.require_bound(packet, rhi.state.vertex_array, "vertex array") {
        return;
    }
    if command.is_indirect() {
        if !rhi.require(packet, &command.indirect_buffer, |t| t == ResourceType::IndirectBuffer) {
            return;
        }
    } else {
        match inline_draw_arguments::<DrawIndexedGraphics, DrawIndexedArguments>(packet, rhi) {
            Some(arguments) => rhi.statistics.instances += arguments.instance_count as u64,
            None => return,
        }
    }
    rhi.statistics.indexed_draws += command.number_of_draws as u64;
}

fn draw_mesh_tasks(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<DrawMeshTasks>();
    if !rhi.require_bound(packet, rhi.state.graphics_pipeline_state, "graphics pipeline state") {
        return;
    }
    if command.is_indirect() {
        if !rhi.require(packet, &command.indirect_buffer, |t| t == ResourceType::IndirectBuffer) {
            return;
        }
    } else if inline_draw_arguments::<DrawMeshTasks, DrawMeshTasksArguments>(packet, rhi).is_none() {
        return;
    }
    rhi.statistics.mesh_task_draws += command.number_of_draws as u64;
}

// ── Compute ─────────────────────────────────────────────────

fn set_compute_root_signature(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetComputeRootSignature>();
    if !rhi.require_optional(packet, &command.root_signature, |t| t == ResourceType::RootSignature) {
        return;
    }
    rhi.state.compute_root_signature = command.root_signature;
    rhi.state.compute_resource_groups.clear();
}

fn set_compute_pipeline_state(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetComputePipelineState>();
    if !rhi.require_optional(packet, &command.compute_pipeline_state, |t| {
        t == ResourceType::ComputePipelineState
    }) {
        return;
    }
    rhi.state.compute_pipeline_state = command.compute_pipeline_state;
}

fn set_compute_resource_group(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetComputeResourceGroup>();
    if !rhi.require_optional(packet, &command.resource_group, |t| t == ResourceType::ResourceGroup) {
        return;
    }
    if !rhi.require_bound(packet, rhi.state.compute_root_signature, "compute root signature") {
        return;
    }
    bind_resource_group(
        &mut rhi.state.compute_resource_groups,
        command.root_parameter_index,
        command.resource_group,
    );
}

fn dispatch_compute(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<DispatchCompute>();
    if !rhi.require_bound(packet, rhi.state.compute_pipeline_state, "compute pipeline state") {
        return;
    }
    if command.group_count_x == 0 || command.group_count_y == 0 || command.group_count_z == 0 {
        // Legal, does nothing
        return;
    }
    rhi.statistics.dispatches += 1;
}

// ── Resource ────────────────────────────────────────────────

fn set_texture_minimum_maximum_mipmap_index(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetTextureMinimumMaximumMipmapIndex>();
    if !rhi.require(packet, &command.texture, ResourceType::is_texture) {
        return;
    }
    rhi.state.mipmap_ranges.insert(
        command.texture.resource_id,
        (command.minimum_mipmap_index, command.maximum_mipmap_index),
    );
}

fn resolve_multisample_framebuffer(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<ResolveMultisampleFramebuffer>();
    if !rhi.require(packet, &command.destination_render_target, ResourceType::is_render_target) {
        return;
    }
    if !rhi.require(packet, &command.source_multisample_framebuffer, |t| {
        t == ResourceType::Framebuffer
    }) {
        return;
    }
    rhi.statistics.copies += 1;
}

fn copy_resource(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<CopyResource>();
    if !rhi.require(packet, &command.destination_resource, |t| t != ResourceType::None) {
        return;
    }
    if !rhi.require(packet, &command.source_resource, |t| t != ResourceType::None) {
        return;
    }
    rhi.statistics.copies += 1;
}

fn generate_mipmaps(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<GenerateMipmaps>();
    rhi.require(packet, &command.resource, ResourceType::is_texture);
}

fn copy_uniform_buffer_data(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<CopyUniformBufferData>();
    if !rhi.require(packet, &command.uniform_buffer, |t| t == ResourceType::UniformBuffer) {
        return;
    }
    rhi.statistics.uniform_bytes += packet.auxiliary::<CopyUniformBufferData>().len() as u64;
}

// ── Query ───────────────────────────────────────────────────

fn reset_query_pool(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<ResetQueryPool>();
    if !rhi.require(packet, &command.query_pool, |t| t == ResourceType::QueryPool) {
        return;
    }
    let pool = command.query_pool.resource_id;
    let first = command.first_query_index;
    let last = first.saturating_add(command.number_of_queries);
    rhi.state
        .open_queries
        .retain(|&(open_pool, index)| open_pool != pool || index < first || index >= last);
}

fn begin_query(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<BeginQuery>();
    if !rhi.require(packet, &command.query_pool, |t| t == ResourceType::QueryPool) {
        return;
    }
    let key = (command.query_pool.resource_id, command.query_index);
    if !rhi.state.open_queries.insert(key) {
        rhi.skip(packet, &format!("query {} is already active", command.query_index));
    }
}

fn end_query(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<EndQuery>();
    if !rhi.require(packet, &command.query_pool, |t| t == ResourceType::QueryPool) {
        return;
    }
    let key = (command.query_pool.resource_id, command.query_index);
    if rhi.state.open_queries.remove(&key) {
        rhi.statistics.queries += 1;
    } else {
        rhi.skip(packet, &format!("query {} was never begun", command.query_index));
    }
}

fn write_timestamp_query(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<WriteTimestampQuery>();
    if !rhi.require(packet, &command.query_pool, |t| t == ResourceType::QueryPool) {
        return;
    }
    rhi.statistics.timestamps += 1;
}

// ── Debug ───────────────────────────────────────────────────

fn set_debug_marker(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<SetDebugMarker>();
    rhi.state.last_debug_marker = Some(command.name().to_string());
    rhi.statistics.debug_markers += 1;
}

fn begin_debug_event(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    let command = packet.fields::<BeginDebugEvent>();
    if rhi.config.log_commands {
        trace!(name = command.name(), depth = rhi.state.debug_event_depth, "begin debug event");
    }
    rhi.state.debug_event_depth += 1;
}

fn end_debug_event(packet: &CommandPacket<'_>, rhi: &mut NullRhi) {
    rhi.begin(packet);
    if rhi.state.debug_event_depth == 0 {
        rhi.skip(packet, "no debug event is open");
        return;
    }
    rhi.state.debug_event_depth -= 1;
}
