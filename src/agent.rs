//! The per-agent record and the template copied onto it at spawn time.

use glam::{Quat, Vec3};

/// Index into the pool's contiguous agent array. Stable for the agent's
/// lifetime, including across despawn/respawn of the same slot.
pub type AgentId = u32;

/// Convention for parking an inactive agent off the navigation plane.
pub const PARKED_Y: f32 = -1000.0;

/// Per-agent tunables copied from a template at `spawn` (C5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTemplate {
    pub speed_max: f32,
    pub flow_weight: f32,
    pub avoid_weight: f32,
    pub cohesion_weight: f32,
    /// Advisory signal for an external animation collaborator; steering never reads it.
    pub walk_speed_threshold: f32,
    /// Selects the C9 dispatch path: plain integration, or publish a
    /// horizontal velocity hint to an external kinematic physics body.
    pub kinematic_physics_backed: bool,
}

impl Default for AgentTemplate {
    fn default() -> Self {
        Self {
            speed_max: 5.0,
            flow_weight: 1.0,
            avoid_weight: 1.0,
            cohesion_weight: 0.5,
            walk_speed_threshold: 0.1,
            kinematic_physics_backed: false,
        }
    }
}

/// A fixed-size agent record, pre-allocated by the pool and toggled
/// active/inactive rather than created/destroyed (see `crate::pool`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,

    pub speed_max: f32,
    pub flow_weight: f32,
    pub avoid_weight: f32,
    pub cohesion_weight: f32,
    pub walk_speed_threshold: f32,
    pub kinematic_physics_backed: bool,

    /// Horizontal velocity published for an external kinematic physics body
    /// when `kinematic_physics_backed` is set (§4.9); unused otherwise.
    pub kinematic_velocity_hint: Vec3,

    /// Cached flow-field cell index; -1 when unassigned.
    pub cell_index: i64,
    pub active: bool,
}

impl Agent {
    /// The parked, inactive agent state skipped by every per-tick job.
    pub fn parked() -> Self {
        Self {
            position: Vec3::new(0.0, PARKED_Y, 0.0),
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            speed_max: 0.0,
            flow_weight: 0.0,
            avoid_weight: 0.0,
            cohesion_weight: 0.0,
            walk_speed_threshold: 0.0,
            kinematic_physics_backed: false,
            kinematic_velocity_hint: Vec3::ZERO,
            cell_index: -1,
            active: false,
        }
    }

    /// Re-activates a parked slot with the caller's position and template.
    pub fn activate(&mut self, position: Vec3, template: AgentTemplate) {
        self.position = position;
        self.orientation = Quat::IDENTITY;
        self.velocity = Vec3::ZERO;
        self.speed_max = template.speed_max;
        self.flow_weight = template.flow_weight;
        self.avoid_weight = template.avoid_weight;
        self.cohesion_weight = template.cohesion_weight;
        self.walk_speed_threshold = template.walk_speed_threshold;
        self.kinematic_physics_backed = template.kinematic_physics_backed;
        self.kinematic_velocity_hint = Vec3::ZERO;
        self.cell_index = -1;
        self.active = true;
    }

    /// Parks the slot; position/orientation are not cleared since nothing
    /// reads them while inactive, matching the off-plane convention above.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.position.y = PARKED_Y;
        self.velocity = Vec3::ZERO;
        self.cell_index = -1;
    }
}
