//! The three-stage flow-field generator: cost → integration → direction.
//!
//! [`FlowField`] owns the three per-cell buffers as a single aggregate, the
//! way the teacher's own `FlowField` resource does, and walks through the
//! `Idle -> BuildingCost -> BuildingIntegration -> BuildingDirection -> Idle`
//! state machine described in the specification whenever the destination
//! changes. The buffers are mutable only during a rebuild and read-only
//! otherwise; no runtime locking is needed because rebuilds run synchronously
//! on the orchestrator thread before any per-tick job is dispatched.

pub mod cost;
pub mod direction;
pub mod integration;

use glam::Vec2;

use crate::error::EngineEvent;
use crate::grid::GridMetadata;
use crate::obstacle::Obstacle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Idle,
    BuildingCost,
    BuildingIntegration,
    BuildingDirection,
}

/// Owns the cost/integration/direction buffers for one grid.
#[derive(Debug, Clone)]
pub struct FlowField {
    pub grid: GridMetadata,
    pub cost: Vec<u8>,
    pub integration: Vec<u16>,
    pub direction: Vec<Vec2>,
    pub default_cost: u8,
    pub obstacle_cost: u8,
    state: GeneratorState,
    destination_cell: Option<(usize, usize)>,
}

impl FlowField {
    pub fn new(grid: GridMetadata, default_cost: u8, obstacle_cost: u8) -> Self {
        let len = grid.cell_count();
        Self {
            grid,
            cost: vec![default_cost; len],
            integration: vec![integration::UNREACHED; len],
            direction: vec![Vec2::ZERO; len],
            default_cost,
            obstacle_cost,
            state: GeneratorState::Idle,
            destination_cell: None,
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn destination_cell(&self) -> Option<(usize, usize)> {
        self.destination_cell
    }

    /// Direction vector at a cached cell index, or zero if out of range
    /// (the `ci == -1` / unassigned edge case from the specification).
    pub fn direction_at_index(&self, cell_index: isize) -> Vec2 {
        if cell_index < 0 || cell_index as usize >= self.direction.len() {
            Vec2::ZERO
        } else {
            self.direction[cell_index as usize]
        }
    }

    /// Runs C2 -> C3 -> C4 in sequence for `destination`, clamped into the
    /// grid by the caller. Emits `DestinationOnObstacle` via `events` when
    /// the destination cell carries the obstacle sentinel: the specification
    /// treats the destination as cost-0 regardless, so the field stays valid.
    pub fn rebuild(&mut self, destination: (usize, usize), obstacles: &[Obstacle], events: &mut Vec<EngineEvent>) {
        self.state = GeneratorState::BuildingCost;
        cost::build_cost_field(&self.grid, self.default_cost, self.obstacle_cost, obstacles, &mut self.cost);

        let dest_idx = self.grid.cell_to_index(destination.0, destination.1);
        if self.cost[dest_idx] == self.obstacle_cost {
            self.cost[dest_idx] = self.default_cost;
            events.push(EngineEvent::DestinationOnObstacle { cell: destination });
        }

        self.state = GeneratorState::BuildingIntegration;
        integration::build_integration_field(
            &self.grid,
            &self.cost,
            self.obstacle_cost,
            destination,
            &mut self.integration,
        );

        self.state = GeneratorState::BuildingDirection;
        direction::build_direction_field(&self.grid, &self.integration, &mut self.direction);

        self.destination_cell = Some(destination);
        self.state = GeneratorState::Idle;
    }
}
