//! Movement integration job (C9): step 3 of the per-tick pipeline.

use glam::Vec3;
use rayon::prelude::*;

use crate::agent::Agent;
use crate::math::face_along;

/// Advances every active agent's position by its synthesized velocity and
/// updates facing. Agents flagged `kinematic_physics_backed` never move
/// themselves here — they publish `kinematic_velocity_hint` for an external
/// physics body to consume and leave `position` untouched (§4.9).
pub fn run(agents: &mut [Agent], dt: f32) {
    agents.par_iter_mut().for_each(|agent| {
        if !agent.active {
            return;
        }

        if agent.kinematic_physics_backed {
            agent.kinematic_velocity_hint = agent.velocity;
        } else {
            agent.position += agent.velocity * dt;
        }

        if let Some(q) = face_along(agent.velocity, Vec3::Y) {
            agent.orientation = q;
        }
    });
}
