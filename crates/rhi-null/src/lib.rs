//! Backend that executes nothing.
//!
//! `NullRhi` implements the full dispatch table, checks the resources each
//! command references, tracks what is bound and counts what would have been
//! submitted to a GPU. Tests and the `rhi` tool replay command buffers
//! against it.

mod dispatch_table;
pub mod null_rhi;
pub mod state;
pub mod statistics;

pub use null_rhi::NullRhi;
pub use state::BoundState;
pub use statistics::NullRhiStatistics;
