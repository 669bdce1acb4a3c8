//! Pre-allocated agent pool (C5).
//!
//! The pool never grows or shrinks after construction: `spawn`/`despawn`
//! toggle an activation flag on a fixed-size array instead of allocating,
//! the same trade the teacher's `InclusionSet` makes for entity subsets
//! that churn every frame. A `FixedBitSet` tracks which slots are active
//! (mirroring `InclusionSet`'s presence bitset) and a small free-list of
//! recently vacated indices lets `spawn` avoid a linear scan in the common
//! case; the externally observable contract — "find the next inactive
//! slot" — is unchanged either way.

use fixedbitset::FixedBitSet;
use glam::Vec3;

use crate::agent::{Agent, AgentId, AgentTemplate};
use crate::error::EngineError;

pub struct AgentPool {
    agents: Vec<Agent>,
    active: FixedBitSet,
    free_list: Vec<AgentId>,
    high_water_mark: usize,
    active_count: usize,
}

impl AgentPool {
    pub fn new(pool_size: usize) -> Self {
        Self {
            agents: vec![Agent::parked(); pool_size],
            active: FixedBitSet::with_capacity(pool_size),
            free_list: Vec::new(),
            high_water_mark: 0,
            active_count: 0,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.agents.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id as usize)
    }

    pub fn is_active(&self, id: AgentId) -> bool {
        (id as usize) < self.active.len() && self.active[id as usize]
    }

    /// Activates the next inactive slot, preferring a recently vacated one
    /// from the free-list before scanning forward past the high-water mark.
    pub fn spawn(&mut self, position: Vec3, template: AgentTemplate) -> Result<AgentId, EngineError> {
        let slot = if let Some(id) = self.free_list.pop() {
            Some(id)
        } else if self.high_water_mark < self.agents.len() {
            let id = self.high_water_mark as AgentId;
            self.high_water_mark += 1;
            Some(id)
        } else {
            None
        };

        match slot {
            Some(id) => {
                self.agents[id as usize].activate(position, template);
                self.active.set(id as usize, true);
                self.active_count += 1;
                Ok(id)
            }
            None => Err(EngineError::PoolExhausted {
                pool_size: self.agents.len(),
            }),
        }
    }

    pub fn despawn(&mut self, id: AgentId) {
        if self.is_active(id) {
            self.agents[id as usize].deactivate();
            self.active.set(id as usize, false);
            self.active_count -= 1;
            self.free_list.push(id);
        }
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (AgentId, &Agent)> {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.active)
            .map(|(i, a)| (i as AgentId, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_activates_and_copies_template() {
        let mut pool = AgentPool::new(4);
        let template = AgentTemplate {
            speed_max: 9.0,
            ..Default::default()
        };
        let id = pool.spawn(Vec3::new(1.0, 0.0, 2.0), template).unwrap();
        let a = pool.get(id).unwrap();
        assert!(a.active);
        assert_eq!(a.position, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(a.speed_max, 9.0);
        assert_eq!(a.cell_index, -1);
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn pool_exhaustion_then_recovery_via_despawn() {
        let mut pool = AgentPool::new(4);
        let mut ids = Vec::new();
        for _ in 0..4 {
            ids.push(pool.spawn(Vec3::ZERO, AgentTemplate::default()).unwrap());
        }
        assert!(matches!(
            pool.spawn(Vec3::ZERO, AgentTemplate::default()),
            Err(EngineError::PoolExhausted { pool_size: 4 })
        ));

        pool.despawn(ids[0]);
        assert_eq!(pool.active_count(), 3);
        let reused = pool.spawn(Vec3::new(5.0, 0.0, 5.0), AgentTemplate::default()).unwrap();
        assert_eq!(reused, ids[0]);
        assert!(pool.is_active(reused));
    }

    #[test]
    fn inactive_agents_are_parked_off_plane() {
        let mut pool = AgentPool::new(1);
        let id = pool.spawn(Vec3::new(3.0, 0.0, 3.0), AgentTemplate::default()).unwrap();
        pool.despawn(id);
        let a = pool.get(id).unwrap();
        assert!(!a.active);
        assert_eq!(a.position.y, crate::agent::PARKED_Y);
    }

    #[test]
    fn iter_active_skips_inactive_slots() {
        let mut pool = AgentPool::new(3);
        let a = pool.spawn(Vec3::ZERO, AgentTemplate::default()).unwrap();
        let _b = pool.spawn(Vec3::ZERO, AgentTemplate::default()).unwrap();
        pool.despawn(a);
        assert_eq!(pool.iter_active().count(), 1);
    }
}
