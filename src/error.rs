//! Error taxonomy and the non-fatal event stream.
//!
//! Configuration problems fail construction (`EngineError`); per-tick
//! anomalies (a target clamped into the grid, a destination sitting on an
//! obstacle) are non-fatal and instead pushed onto the engine's event buffer
//! for the caller to drain, matching the corpus convention of a library
//! surfacing warnings without forcing a `Result` through every call.

use thiserror::Error;

/// Fatal errors, all of which are raised during construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("agent pool exhausted ({pool_size} active agents)")]
    PoolExhausted { pool_size: usize },
}

/// Non-fatal, out-of-band notifications collected during `set_target`,
/// `add_obstacle`, and `tick`, and returned by [`crate::engine::CrowdEngine::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A target position outside the grid was clamped to the nearest in-bounds cell.
    TargetClamped { requested: glam::Vec3, clamped_cell: (usize, usize) },
    /// An obstacle position outside the grid was clamped to the nearest in-bounds cell.
    ObstacleClamped { requested: glam::Vec3, clamped_cell: (usize, usize) },
    /// The destination cell carried the obstacle sentinel cost; it was treated
    /// as cost-0 for integration purposes so the field remains valid.
    DestinationOnObstacle { cell: (usize, usize) },
    /// `spawn` was called with no inactive slot available.
    SpawnFailed { pool_size: usize },
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::TargetClamped { requested, clamped_cell } => write!(
                f,
                "target {requested:?} lies outside the grid; clamped to cell {clamped_cell:?}"
            ),
            EngineEvent::ObstacleClamped { requested, clamped_cell } => write!(
                f,
                "obstacle {requested:?} lies outside the grid; clamped to cell {clamped_cell:?}"
            ),
            EngineEvent::DestinationOnObstacle { cell } => {
                write!(f, "destination cell {cell:?} sits on an obstacle; treated as cost-0")
            }
            EngineEvent::SpawnFailed { pool_size } => {
                write!(f, "spawn failed: pool of {pool_size} agents is exhausted")
            }
        }
    }
}
