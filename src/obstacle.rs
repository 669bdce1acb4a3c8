//! Obstacle registry: stable ids over a caller-supplied `(position, radius)` set.
//!
//! The specification treats obstacles as read-only inputs to the cost field
//! builder but also asks for `add_obstacle(..) -> id` / `remove_obstacle(id)`,
//! which implies bookkeeping the distilled spec takes for granted. This is
//! that bookkeeping, grounded in the corpus's habit of reaching for an
//! `FxHashMap` (`rustc-hash`) for small, hot, non-adversarial id maps.

use glam::Vec3;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Vec3,
    pub radius: f32,
}

#[derive(Debug, Default)]
pub struct ObstacleSet {
    entries: FxHashMap<ObstacleId, Obstacle>,
    next_id: u32,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, position: Vec3, radius: f32) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(id, Obstacle { id, position, radius });
        id
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot used by the cost-field builder, which only needs an
    /// iterable view, not the id-keyed map.
    pub fn to_vec(&self) -> Vec<Obstacle> {
        self.entries.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_roundtrips() {
        let mut set = ObstacleSet::new();
        let id = set.add(Vec3::new(1.0, 0.0, 1.0), 2.0);
        assert_eq!(set.len(), 1);
        let removed = set.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(set.is_empty());
    }

    #[test]
    fn ids_are_unique_and_stable() {
        let mut set = ObstacleSet::new();
        let a = set.add(Vec3::ZERO, 1.0);
        let b = set.add(Vec3::ONE, 1.0);
        assert_ne!(a, b);
        assert_eq!(set.to_vec().len(), 2);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut set = ObstacleSet::new();
        assert!(set.remove(ObstacleId(42)).is_none());
    }
}
