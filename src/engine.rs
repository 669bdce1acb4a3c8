//! Public orchestrator (T): owns the grid, the flow field, the agent pool,
//! the obstacle registry, and the tick-scoped spatial hash, and drives the
//! three per-tick jobs in order.

use glam::{Vec2, Vec3};

use crate::agent::{Agent, AgentId, AgentTemplate};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineEvent};
use crate::fields::FlowField;
use crate::grid::GridMetadata;
use crate::jobs::{cell_index, movement, velocity};
use crate::obstacle::{Obstacle, ObstacleId, ObstacleSet};
use crate::pool::AgentPool;
use crate::spatial_hash::SpatialHash;

pub struct CrowdEngine {
    config: EngineConfig,
    flow_field: FlowField,
    pool: AgentPool,
    obstacles: ObstacleSet,
    hash: SpatialHash,
    target_cell: Option<(usize, usize)>,
    field_dirty: bool,
    events: Vec<EngineEvent>,
    tick_counter: u64,
}

impl CrowdEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let grid = GridMetadata::new(config.grid_width, config.grid_height, config.cell_size, config.grid_origin);
        let flow_field = FlowField::new(grid, config.default_cost, config.obstacle_cost);
        let pool = AgentPool::new(config.pool_size);
        let hash = SpatialHash::new(config.effective_spatial_cell_size());

        tracing::debug!(
            grid_width = config.grid_width,
            grid_height = config.grid_height,
            pool_size = config.pool_size,
            "crowd engine constructed"
        );

        Ok(Self {
            config,
            flow_field,
            pool,
            obstacles: ObstacleSet::new(),
            hash,
            target_cell: None,
            field_dirty: false,
            events: Vec::new(),
            tick_counter: 0,
        })
    }

    /// Sets the shared navigation destination. The flow field is rebuilt
    /// lazily, on the next `tick`, rather than synchronously here. Re-setting
    /// the same target cell is a no-op for rebuild purposes (§8 idempotence),
    /// though an out-of-bounds request still emits its clamp warning every call.
    pub fn set_target(&mut self, world_pos: Vec3) {
        let grid = self.flow_field.grid;
        if !grid.world_in_bounds(world_pos) {
            let cell = grid.world_to_cell(world_pos);
            self.events.push(EngineEvent::TargetClamped {
                requested: world_pos,
                clamped_cell: cell,
            });
        }
        let cell = grid.world_to_cell(world_pos);
        if self.target_cell != Some(cell) {
            self.target_cell = Some(cell);
            self.field_dirty = true;
        }
    }

    pub fn add_obstacle(&mut self, world_pos: Vec3, radius: f32) -> ObstacleId {
        let grid = self.flow_field.grid;
        if !grid.world_in_bounds(world_pos) {
            let cell = grid.world_to_cell(world_pos);
            self.events.push(EngineEvent::ObstacleClamped {
                requested: world_pos,
                clamped_cell: cell,
            });
        }
        let id = self.obstacles.add(world_pos, radius);
        self.field_dirty = true;
        id
    }

    pub fn remove_obstacle(&mut self, id: ObstacleId) {
        if self.obstacles.remove(id).is_some() {
            self.field_dirty = true;
        }
    }

    pub fn spawn(&mut self, world_pos: Vec3, template: AgentTemplate) -> Result<AgentId, EngineError> {
        match self.pool.spawn(world_pos, template) {
            Ok(id) => Ok(id),
            Err(err) => {
                self.events.push(EngineEvent::SpawnFailed {
                    pool_size: self.pool.pool_size(),
                });
                Err(err)
            }
        }
    }

    pub fn despawn(&mut self, id: AgentId) {
        self.pool.despawn(id);
    }

    /// Advances the simulation by `dt` seconds: rebuilds the flow field if
    /// the target or obstacle set changed since the last tick, then runs
    /// the cell-index, velocity synthesis, and movement jobs in order.
    pub fn tick(&mut self, dt: f32) {
        if self.field_dirty {
            if let Some(destination) = self.target_cell {
                let obstacles: Vec<Obstacle> = self.obstacles.to_vec();
                self.flow_field.rebuild(destination, &obstacles, &mut self.events);
            }
            self.field_dirty = false;
        }

        self.hash.clear();
        let grid = self.flow_field.grid;
        cell_index::run(&grid, self.pool.agents_mut(), &self.hash);

        let params = velocity::VelocityParams {
            dt,
            avoid_radius: self.config.avoid_radius,
            cohesion_radius: self.config.cohesion_radius,
            profile: self.config.profile,
            jitter_seed: self.config.jitter_seed,
            tick: self.tick_counter,
        };
        velocity::run(&self.flow_field, &self.hash, self.pool.agents_mut(), &params);

        movement::run(self.pool.agents_mut(), dt);

        self.tick_counter = self.tick_counter.wrapping_add(1);
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.pool_size()
    }

    pub fn iter_active_agents(&self) -> impl Iterator<Item = (AgentId, &Agent)> {
        self.pool.iter_active()
    }

    /// Read-only snapshot of the current direction field, indexed the same
    /// way as `Agent::cell_index`. Intended for debugging/visualization.
    pub fn direction_field_snapshot(&self) -> &[Vec2] {
        &self.flow_field.direction
    }

    /// Drains and returns every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig {
            grid_width: 10,
            grid_height: 10,
            cell_size: 1.0,
            grid_origin: Vec3::ZERO,
            pool_size: 4,
            ..Default::default()
        }
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let mut c = config();
        c.pool_size = 0;
        assert!(CrowdEngine::new(c).is_err());
    }

    #[test]
    fn agent_moves_toward_target_over_several_ticks() {
        let mut engine = CrowdEngine::new(config()).unwrap();
        engine.set_target(Vec3::new(9.5, 0.0, 9.5));
        let id = engine.spawn(Vec3::new(0.5, 0.0, 0.5), AgentTemplate::default()).unwrap();

        let start = engine.iter_active_agents().find(|(i, _)| *i == id).unwrap().1.position;
        for _ in 0..20 {
            engine.tick(0.1);
        }
        let end = engine.iter_active_agents().find(|(i, _)| *i == id).unwrap().1.position;
        assert!(end.distance(Vec3::new(9.5, 0.0, 9.5)) < start.distance(Vec3::new(9.5, 0.0, 9.5)));
    }

    #[test]
    fn out_of_bounds_target_emits_clamped_event() {
        let mut engine = CrowdEngine::new(config()).unwrap();
        engine.set_target(Vec3::new(500.0, 0.0, 500.0));
        let events = engine.drain_events();
        assert!(events.iter().any(|e| matches!(e, EngineEvent::TargetClamped { .. })));
    }

    #[test]
    fn spawn_failure_is_reported_as_error_and_event() {
        let mut engine = CrowdEngine::new(config()).unwrap();
        for _ in 0..4 {
            engine.spawn(Vec3::ZERO, AgentTemplate::default()).unwrap();
        }
        let err = engine.spawn(Vec3::ZERO, AgentTemplate::default());
        assert!(matches!(err, Err(EngineError::PoolExhausted { pool_size: 4 })));
        let events = engine.drain_events();
        assert!(events.iter().any(|e| matches!(e, EngineEvent::SpawnFailed { pool_size: 4 })));
    }

    #[test]
    fn retargeting_invalidates_and_rebuilds_the_field() {
        let mut engine = CrowdEngine::new(config()).unwrap();
        engine.set_target(Vec3::new(9.5, 0.0, 9.5));
        engine.tick(0.016);
        let first = engine.direction_field_snapshot().to_vec();

        engine.set_target(Vec3::new(0.5, 0.0, 0.5));
        engine.tick(0.016);
        let second = engine.direction_field_snapshot().to_vec();

        assert_ne!(first, second);
    }
}
