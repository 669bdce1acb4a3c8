//! Velocity synthesis job (C8): step 2 of the per-tick pipeline.
//!
//! The most algorithmically substantial job — flow following, separation,
//! cohesion, optional jitter, damped blending, and a final speed clamp —
//! executed per active agent in parallel. Every agent reads only its own
//! record plus the (immutable, this tick) spatial hash and direction field,
//! so there is no cross-agent write contention.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use rayon::prelude::*;

use crate::agent::Agent;
use crate::config::BehaviorProfile;
use crate::fields::FlowField;
use crate::spatial_hash::SpatialHash;

const NEIGHBOR_DIST_SQ_FLOOR: f32 = 0.01;
const COHESION_CENTER_FLOOR: f32 = 0.1;
const JITTER_RANGE: f32 = 0.3;
const JITTER_MAGNITUDE_SCALE: f32 = 0.1;

pub struct VelocityParams {
    pub dt: f32,
    pub avoid_radius: f32,
    pub cohesion_radius: f32,
    pub profile: BehaviorProfile,
    pub jitter_seed: u64,
    pub tick: u64,
}

pub fn run(flow_field: &FlowField, hash: &SpatialHash, agents: &mut [Agent], params: &VelocityParams) {
    agents.par_iter_mut().enumerate().for_each(|(id, agent)| {
        if !agent.active {
            return;
        }
        agent.velocity = synthesize(id as u32, agent, flow_field, hash, params);
    });
}

fn synthesize(id: u32, agent: &Agent, flow_field: &FlowField, hash: &SpatialHash, params: &VelocityParams) -> Vec3 {
    let flow2 = flow_field.direction_at_index(agent.cell_index as isize);
    let flow3 = Vec3::new(flow2.x, 0.0, flow2.y);

    let avoid_radius_sq = params.avoid_radius * params.avoid_radius;
    let cohesion_radius_sq = params.cohesion_radius * params.cohesion_radius;

    let mut separation_sum = Vec3::ZERO;
    let mut separation_count: u32 = 0;
    let mut center_of_mass = Vec3::ZERO;
    let mut cohesion_count: u32 = 0;

    hash.for_each_in_neighborhood(agent.position, |entry| {
        if entry.agent_id == id {
            return;
        }
        let d = agent.position - entry.position;
        let dist_sq = d.length_squared();

        if dist_sq < avoid_radius_sq && dist_sq > NEIGHBOR_DIST_SQ_FLOOR {
            let dist = dist_sq.sqrt();
            let unit = d / dist;
            let strength = match params.profile {
                BehaviorProfile::Natural => {
                    let t = 1.0 - dist / params.avoid_radius;
                    t * t
                }
                BehaviorProfile::Legacy => 1.0 - dist / params.avoid_radius,
            };
            separation_sum += unit * strength;
            separation_count += 1;
        }

        if dist_sq < cohesion_radius_sq && dist_sq > NEIGHBOR_DIST_SQ_FLOOR {
            center_of_mass += entry.position;
            cohesion_count += 1;
        }
    });

    let separation = if separation_count > 0 {
        separation_sum / separation_count as f32
    } else {
        Vec3::ZERO
    };

    let cohesion = if cohesion_count > 0 {
        let center = center_of_mass / cohesion_count as f32;
        let to_center = center - agent.position;
        if to_center.length() > COHESION_CENTER_FLOOR {
            to_center.normalize()
        } else {
            Vec3::ZERO
        }
    } else {
        Vec3::ZERO
    };

    let jitter = if params.profile.jitter_enabled() {
        sample_jitter(id, params)
    } else {
        Vec3::ZERO
    };

    let mut desired = flow3 * agent.flow_weight * agent.speed_max
        + separation * agent.avoid_weight * agent.speed_max
        + cohesion * agent.cohesion_weight * agent.speed_max;
    if params.profile.jitter_enabled() {
        desired += jitter * agent.speed_max * JITTER_MAGNITUDE_SCALE;
    }

    let alpha = (params.dt * params.profile.damping_k()).clamp(0.0, 1.0);
    let mut v = agent.velocity.lerp(desired, alpha);

    if v.length_squared() > agent.speed_max * agent.speed_max {
        v = v.normalize() * agent.speed_max;
    }

    if !v.is_finite() {
        v = Vec3::ZERO;
    }

    v
}

/// Deterministic per-agent, per-tick jitter: a fresh RNG seeded from the
/// engine's jitter seed, the agent's id, and the current tick, so results
/// reproduce exactly for a given `(seed, agent_id, tick)` triple while still
/// varying tick to tick — the specification only requires a seed *fixed by
/// the caller* for reproducibility, not that the value be constant forever.
fn sample_jitter(agent_id: u32, params: &VelocityParams) -> Vec3 {
    let mixed = params
        .jitter_seed
        .wrapping_add(agent_id as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ params.tick.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    let mut rng = SmallRng::seed_from_u64(mixed);
    let jx = rng.random_range(-JITTER_RANGE..=JITTER_RANGE);
    let jz = rng.random_range(-JITTER_RANGE..=JITTER_RANGE);
    Vec3::new(jx, 0.0, jz)
}
