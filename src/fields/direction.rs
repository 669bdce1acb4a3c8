//! Direction field builder (C4): per-cell parallel gradient descent.

use glam::Vec2;
use rayon::prelude::*;

use crate::fields::integration::UNREACHED;
use crate::grid::GridMetadata;

/// Neighbor scan order the teacher's own `generate_vector_field` uses:
/// cardinals first, then diagonals. The specification requires matching it
/// exactly since ties resolve to "first improving neighbor encountered".
const NEIGHBORS8: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Computes one direction vector per cell from the integration field.
///
/// Embarrassingly parallel: each cell's result depends only on its own
/// integration value and its (read-only) neighbors.
pub fn build_direction_field(grid: &GridMetadata, integration: &[u16], direction: &mut Vec<Vec2>) {
    let len = grid.cell_count();
    direction.clear();
    direction.resize(len, Vec2::ZERO);

    direction
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, out)| {
            let cx = (idx % grid.width) as i32;
            let cy = (idx / grid.width) as i32;
            *out = direction_at(grid, integration, cx, cy, integration[idx]);
        });
}

fn direction_at(grid: &GridMetadata, integration: &[u16], cx: i32, cy: i32, cur: u16) -> Vec2 {
    if cur == UNREACHED {
        return Vec2::ZERO;
    }

    let mut best_cost = cur;
    let mut best_dir = (0i32, 0i32);

    for (dx, dy) in NEIGHBORS8 {
        let nx = cx + dx;
        let ny = cy + dy;
        if !grid.in_bounds(nx as isize, ny as isize) {
            continue;
        }
        let n_idx = grid.cell_to_index(nx as usize, ny as usize);
        let n_cost = integration[n_idx];
        if n_cost < best_cost {
            best_cost = n_cost;
            best_dir = (dx, dy);
        }
    }

    if best_dir == (0, 0) {
        Vec2::ZERO
    } else {
        let v = Vec2::new(best_dir.0 as f32, best_dir.1 as f32);
        if v.length_squared() > 0.0 {
            let n = v.normalize();
            if n.is_finite() {
                n
            } else {
                Vec2::ZERO
            }
        } else {
            Vec2::ZERO
        }
    }
}
