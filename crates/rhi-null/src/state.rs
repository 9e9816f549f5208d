use std::collections::{BTreeMap, BTreeSet};

use rhi_command::commands::{ScissorRectangle, Viewport};
use rhi_command::ResourceHandle;

/// Everything the command stream has bound so far. Null handles mean unbound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundState {
    pub graphics_root_signature: ResourceHandle,
    pub graphics_pipeline_state: ResourceHandle,
    /// Root parameter index -> resource group
    pub graphics_resource_groups: BTreeMap<u32, ResourceHandle>,
    pub vertex_array: ResourceHandle,
    pub render_target: ResourceHandle,
    pub viewports: Vec<Viewport>,
    pub scissor_rectangles: Vec<ScissorRectangle>,

    pub compute_root_signature: ResourceHandle,
    pub compute_pipeline_state: ResourceHandle,
    pub compute_resource_groups: BTreeMap<u32, ResourceHandle>,

    /// Texture resource id -> (minimum, maximum) mipmap index
    pub mipmap_ranges: BTreeMap<u64, (u32, u32)>,
    /// (query pool resource id, query index) pairs begun but not yet ended
    pub open_queries: BTreeSet<(u64, u32)>,
    pub debug_event_depth: u32,
    pub last_debug_marker: Option<String>,
}

/// Bind `group` at `index`, or unbind the slot for a null handle.
pub(crate) fn bind_resource_group(
    groups: &mut BTreeMap<u32, ResourceHandle>,
    index: u32,
    group: ResourceHandle,
) {
    if group.is_null() {
        groups.remove(&index);
    } else {
        groups.insert(index, group);
    }
}
