//! Flow-field crowd navigation: cost/integration/direction field generation
//! plus a parallel, spatial-hash-backed steering pipeline for large agent
//! counts.
//!
//! [`CrowdEngine`] is the single entry point: construct it from an
//! [`EngineConfig`], set a target and obstacles, spawn agents into the fixed
//! pool, and call [`CrowdEngine::tick`] once per simulation step.

pub mod agent;
pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod grid;
pub mod jobs;
pub mod math;
pub mod obstacle;
pub mod pool;
pub mod spatial_hash;

pub use agent::{Agent, AgentId, AgentTemplate};
pub use config::{BehaviorProfile, EngineConfig};
pub use engine::CrowdEngine;
pub use error::{EngineError, EngineEvent};
pub use fields::{FlowField, GeneratorState};
pub use grid::GridMetadata;
pub use obstacle::{Obstacle, ObstacleId};
pub use pool::AgentPool;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Conditionally logs every 100th tick when the `perf_stats` feature is
/// enabled; compiles to nothing (arguments included) otherwise.
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick % 100 == 0 {
            tracing::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {};
}
