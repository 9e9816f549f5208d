use std::fmt;

use rhi_command::dispatch::NUMBER_OF_FUNCTIONS;
use rhi_command::CommandDispatchFunctionIndex;

/// Counters accumulated over every command dispatched to a `NullRhi`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullRhiStatistics {
    /// Packets dispatched, skipped ones included
    pub commands: u64,
    pub draws: u64,
    pub indexed_draws: u64,
    pub mesh_task_draws: u64,
    /// Instances of inline draws; indirect draws are not counted
    pub instances: u64,
    pub dispatches: u64,
    pub clears: u64,
    /// Resource copies and multisample resolves
    pub copies: u64,
    pub uniform_bytes: u64,
    pub queries: u64,
    pub timestamps: u64,
    pub debug_markers: u64,
    /// Packets rejected by validation
    pub skipped_commands: u64,
    per_command: [u64; NUMBER_OF_FUNCTIONS],
}

impl NullRhiStatistics {
    /// How often the handler for `index` ran.
    pub fn invocations(&self, index: CommandDispatchFunctionIndex) -> u64 {
        self.per_command[index as usize]
    }

    pub(crate) fn record(&mut self, raw_index: u32) {
        self.commands += 1;
        if let Some(count) = self.per_command.get_mut(raw_index as usize) {
            *count += 1;
        }
    }
}

impl fmt::Display for NullRhiStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "commands:        {}", self.commands)?;
        writeln!(f, "skipped:         {}", self.skipped_commands)?;
        writeln!(f, "draws:           {}", self.draws)?;
        writeln!(f, "indexed draws:   {}", self.indexed_draws)?;
        writeln!(f, "mesh task draws: {}", self.mesh_task_draws)?;
        writeln!(f, "instances:       {}", self.instances)?;
        writeln!(f, "dispatches:      {}", self.dispatches)?;
        writeln!(f, "clears:          {}", self.clears)?;
        writeln!(f, "copies:          {}", self.copies)?;
        writeln!(f, "uniform bytes:   {}", self.uniform_bytes)?;
        writeln!(f, "queries:         {}", self.queries)?;
        writeln!(f, "timestamps:      {}", self.timestamps)?;
        write!(f, "debug markers:   {}", self.debug_markers)
    }
}
