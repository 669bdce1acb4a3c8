//! Cell-index & hash population job (C7): step 1 of the per-tick pipeline.

use rayon::prelude::*;

use crate::agent::Agent;
use crate::grid::GridMetadata;
use crate::spatial_hash::SpatialHash;

/// For every active agent: caches its flow-field cell index and inserts it
/// into the spatial hash. Runs in parallel; each agent only ever writes its
/// own `cell_index`, and the hash itself accepts concurrent writers.
pub fn run(grid: &GridMetadata, agents: &mut [Agent], hash: &SpatialHash) {
    agents.par_iter_mut().enumerate().for_each(|(id, agent)| {
        if !agent.active {
            return;
        }
        let (cx, cy) = grid.world_to_cell(agent.position);
        agent.cell_index = grid.cell_to_index(cx, cy) as i64;
        hash.insert(agent.position, id as u32);
    });
}
