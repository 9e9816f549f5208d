use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rhi_command::{ResourceHandle, ResourceType};
use tracing::debug;

/// What the registry knows about a live resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescription {
    pub resource_type: ResourceType,
    pub debug_name: String,
}

/// Thread-safe table of live resources. Backends use it to check the handles
/// recorded in command packets before acting on them.
pub struct ResourceRegistry {
    resources: DashMap<u64, ResourceDescription>,
    next_id: AtomicU64,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: DashMap::new(),
            // Id 0 is the null handle
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new resource and return its handle.
    pub fn create(&self, resource_type: ResourceType, debug_name: &str) -> ResourceHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.resources.insert(
            id,
            ResourceDescription {
                resource_type,
                debug_name: debug_name.to_string(),
            },
        );
        debug!(id, ?resource_type, debug_name, "created resource");
        ResourceHandle::new(id, resource_type)
    }

    /// Look up a resource. A handle whose recorded type disagrees with the
    /// registered one does not resolve.
    pub fn get(&self, handle: &ResourceHandle) -> Option<ResourceDescription> {
        self.resources
            .get(&handle.resource_id)
            .filter(|description| handle.resource_type == description.resource_type as u32)
            .map(|description| description.clone())
    }

    pub fn contains(&self, handle: &ResourceHandle) -> bool {
        self.get(handle).is_some()
    }

    /// True when `handle` is live and its type satisfies `accepts`.
    pub fn contains_typed(&self, handle: &ResourceHandle, accepts: fn(ResourceType) -> bool) -> bool {
        self.get(handle)
            .is_some_and(|description| accepts(description.resource_type))
    }

    /// Remove a resource. Returns its description if it was live.
    pub fn destroy(&self, handle: &ResourceHandle) -> Option<ResourceDescription> {
        if !self.contains(handle) {
            return None;
        }
        let (_, description) = self.resources.remove(&handle.resource_id)?;
        debug!(id = handle.resource_id, "destroyed resource");
        Some(description)
    }

    /// Return number of live resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
