//! Small glam-based helpers shared by the per-tick jobs.

use glam::{Quat, Vec3};

const FACING_DIST_SQ_FLOOR: f32 = 0.01;

/// Orientation that faces `dir` on the horizontal plane, keeping `up` as the
/// rotation axis' reference. Returns `None` when `dir` is too short to yield
/// a stable heading (caller keeps the previous orientation in that case).
pub fn face_along(dir: Vec3, up: Vec3) -> Option<Quat> {
    if dir.length_squared() <= FACING_DIST_SQ_FLOOR {
        return None;
    }
    let _ = up; // steering is planar; orientation only ever yaws around Y
    let forward = dir.normalize();
    Some(Quat::from_rotation_arc(Vec3::Z, forward))
}
