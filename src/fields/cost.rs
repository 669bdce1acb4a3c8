//! Cost field builder (C2).

use rayon::prelude::*;

use crate::grid::GridMetadata;
use crate::obstacle::Obstacle;

/// Fills `cost` with `default_cost`, then stamps every obstacle's axis-aligned
/// bounding square with `obstacle_cost`.
///
/// Initialization is embarrassingly parallel across cells; obstacle stamping
/// runs sequentially since `obstacles` is typically small relative to the
/// grid. The square (not disk) stamp is a deliberate approximation carried
/// over from the source behavior — see the crate's design notes.
pub fn build_cost_field(
    grid: &GridMetadata,
    default_cost: u8,
    obstacle_cost: u8,
    obstacles: &[Obstacle],
    cost: &mut Vec<u8>,
) {
    let len = grid.cell_count();
    if cost.len() != len {
        *cost = vec![default_cost; len];
    } else {
        cost.par_iter_mut().for_each(|c| *c = default_cost);
    }

    for obstacle in obstacles {
        stamp_obstacle(grid, obstacle_cost, obstacle, cost);
    }
}

fn stamp_obstacle(grid: &GridMetadata, obstacle_cost: u8, obstacle: &Obstacle, cost: &mut [u8]) {
    let (center_x, center_y) = grid.world_to_cell(obstacle.position);
    let cell_radius = (obstacle.radius / grid.cell_size).ceil() as isize;

    let cx = center_x as isize;
    let cy = center_y as isize;

    for dy in -cell_radius..=cell_radius {
        for dx in -cell_radius..=cell_radius {
            let nx = cx + dx;
            let ny = cy + dy;
            if grid.in_bounds(nx, ny) {
                let idx = grid.cell_to_index(nx as usize, ny as usize);
                cost[idx] = obstacle_cost;
            }
        }
    }
}
