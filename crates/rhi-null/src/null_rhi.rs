use std::sync::Arc;

use rhi_command::{CommandBuffer, CommandPacket, DispatchTable, ResourceHandle, ResourceType, Rhi};
use rhi_core::config::NullBackendConfig;
use rhi_core::ResourceRegistry;
use tracing::{debug, info, trace, warn};

use crate::dispatch_table::NULL_DISPATCH_TABLE;
use crate::state::BoundState;
use crate::statistics::NullRhiStatistics;

/// A backend that validates and tracks commands without executing them.
pub struct NullRhi {
    pub(crate) config: NullBackendConfig,
    registry: Arc<ResourceRegistry>,
    pub(crate) state: BoundState,
    pub(crate) statistics: NullRhiStatistics,
}

impl NullRhi {
    pub fn new(config: NullBackendConfig) -> Self {
        Self::with_registry(config, Arc::new(ResourceRegistry::new()))
    }

    /// Share an existing registry, e.g. one populated by other threads.
    pub fn with_registry(config: NullBackendConfig, registry: Arc<ResourceRegistry>) -> Self {
        info!(
            validate_resources = config.validate_resources,
            log_commands = config.log_commands,
            "null RHI created"
        );
        Self {
            config,
            registry,
            state: BoundState::default(),
            statistics: NullRhiStatistics::default(),
        }
    }

    pub fn config(&self) -> &NullBackendConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    pub fn create_resource(&self, resource_type: ResourceType, debug_name: &str) -> ResourceHandle {
        self.registry.create(resource_type, debug_name)
    }

    /// Returns false if the handle was not live.
    pub fn destroy_resource(&self, handle: &ResourceHandle) -> bool {
        self.registry.destroy(handle).is_some()
    }

    pub fn state(&self) -> &BoundState {
        &self.state
    }

    pub fn statistics(&self) -> &NullRhiStatistics {
        &self.statistics
    }

    /// Unbind everything, e.g. between frames.
    pub fn reset_state(&mut self) {
        self.state = BoundState::default();
    }

    pub fn reset_statistics(&mut self) {
        self.statistics = NullRhiStatistics::default();
    }

    /// Count a dispatched packet. Every handler calls this first.
    pub(crate) fn begin(&mut self, packet: &CommandPacket<'_>) {
        self.statistics.record(packet.raw_dispatch_index());
        if self.config.log_commands {
            trace!(
                offset = packet.offset(),
                command = command_name(packet),
                auxiliary_size = packet.auxiliary_size(),
                "dispatch"
            );
        }
    }

    /// Reject the packet. Always returns false so handlers can `return rhi.skip(..)`.
    pub(crate) fn skip(&mut self, packet: &CommandPacket<'_>, reason: &str) -> bool {
        warn!(
            offset = packet.offset(),
            command = command_name(packet),
            "skipping command: {}",
            reason
        );
        self.statistics.skipped_commands += 1;
        false
    }

    /// Check a handle the command cannot do without.
    pub(crate) fn require(
        &mut self,
        packet: &CommandPacket<'_>,
        handle: &ResourceHandle,
        accepts: fn(ResourceType) -> bool,
    ) -> bool {
        if !self.config.validate_resources {
            return true;
        }
        if handle.is_null() {
            return self.skip(packet, "required resource is null");
        }
        self.check_registered(packet, handle, accepts)
    }

    /// Check a handle where null means unbind.
    pub(crate) fn require_optional(
        &mut self,
        packet: &CommandPacket<'_>,
        handle: &ResourceHandle,
        accepts: fn(ResourceType) -> bool,
    ) -> bool {
        if !self.config.validate_resources || handle.is_null() {
            return true;
        }
        self.check_registered(packet, handle, accepts)
    }

    /// Check bound state the command depends on.
    pub(crate) fn require_bound(&mut self, packet: &CommandPacket<'_>, bound: ResourceHandle, what: &str) -> bool {
        if !self.config.validate_resources || !bound.is_null() {
            return true;
        }
        self.skip(packet, &format!("no {} bound", what))
    }

    fn check_registered(
        &mut self,
        packet: &CommandPacket<'_>,
        handle: &ResourceHandle,
        accepts: fn(ResourceType) -> bool,
    ) -> bool {
        if self.registry.contains_typed(handle, accepts) {
            return true;
        }
        let reason = match self.registry.get(handle) {
            Some(description) => format!(
                "resource {} ({:?} \"{}\") has the wrong type",
                handle.resource_id, description.resource_type, description.debug_name
            ),
            None => format!("unknown resource {}", handle.resource_id),
        };
        self.skip(packet, &reason)
    }
}

impl Rhi for NullRhi {
    fn dispatch_table() -> &'static DispatchTable<Self> {
        &NULL_DISPATCH_TABLE
    }

    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) {
        debug!(
            commands = command_buffer.number_of_commands(),
            bytes = command_buffer.size(),
            "submitting command buffer"
        );
        command_buffer.dispatch_to_rhi(self);
    }
}

fn command_name(packet: &CommandPacket<'_>) -> &'static str {
    packet.dispatch_index().map(|index| index.name()).unwrap_or("unknown")
}
