//! Tick-scoped spatial hash (C6): the broad-phase neighbor index rebuilt
//! every tick and read by the velocity synthesis job.
//!
//! The teacher's own spatial index is a staggered dual-grid keyed by
//! `row * cols + col`; this crate instead uses the exact hash specified —
//! `key(hx, hy) = hx*P1 XOR hy*P2` as `i32`, with the two "Optimized Spatial
//! Hashing" primes — backed by `dashmap`'s sharded concurrent map so
//! thousands of agents can insert in parallel during C7 without a single
//! global lock, the same "concurrent insert-only / read-only / single-shot
//! reset" contract the specification calls for.

use dashmap::DashMap;
use glam::Vec3;
use smallvec::SmallVec;

use crate::agent::AgentId;

const P1: i32 = 73_856_093;
const P2: i32 = 19_349_663;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashEntry {
    pub position: Vec3,
    pub agent_id: AgentId,
}

/// Typical bucket occupancy at the tuned `spatial_cell_size` is small, so
/// entries live inline up to this many before spilling to the heap.
type Bucket = SmallVec<[HashEntry; 8]>;

pub struct SpatialHash {
    cell_size: f32,
    buckets: DashMap<i32, Bucket>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            buckets: DashMap::new(),
        }
    }

    /// Drops all entries, ready for the next tick's population.
    pub fn clear(&self) {
        self.buckets.clear();
    }

    /// Hash-cell coordinate of a raw world position, from `x`/`z` directly
    /// (not offset by grid origin — matching the reference implementation).
    pub fn hash_cell(&self, pos: Vec3) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.z / self.cell_size).floor() as i32,
        )
    }

    #[inline]
    pub fn key(hx: i32, hy: i32) -> i32 {
        (hx.wrapping_mul(P1)) ^ (hy.wrapping_mul(P2))
    }

    /// Inserts one entry. Safe to call concurrently from many workers (C7).
    pub fn insert(&self, position: Vec3, agent_id: AgentId) {
        let (hx, hy) = self.hash_cell(position);
        let key = Self::key(hx, hy);
        self.buckets.entry(key).or_default().push(HashEntry { position, agent_id });
    }

    pub fn total_entries(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    /// Visits every entry in the 3x3 hash-cell neighborhood of `pos`,
    /// including `pos`'s own cell. Callers apply the self-exclusion check
    /// (by agent identity) and the real-world distance re-check themselves,
    /// since hash-cell adjacency only approximates world-space adjacency.
    pub fn for_each_in_neighborhood(&self, pos: Vec3, mut f: impl FnMut(&HashEntry)) {
        let (hx, hy) = self.hash_cell(pos);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let key = Self::key(hx + dx, hy + dy);
                if let Some(bucket) = self.buckets.get(&key) {
                    for entry in bucket.iter() {
                        f(entry);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn insert_then_lookup_in_same_cell() {
        let hash = SpatialHash::new(5.0);
        hash.insert(Vec3::new(1.0, 0.0, 1.0), 0);
        hash.insert(Vec3::new(2.0, 0.0, 2.0), 1);

        let mut seen = Vec::new();
        hash.for_each_in_neighborhood(Vec3::new(1.5, 0.0, 1.5), |e| seen.push(e.agent_id));
        seen.sort();
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn clear_removes_all_entries() {
        let hash = SpatialHash::new(5.0);
        hash.insert(Vec3::ZERO, 0);
        hash.clear();
        assert_eq!(hash.total_entries(), 0);
    }

    #[test]
    fn neighborhood_excludes_far_cells() {
        let hash = SpatialHash::new(1.0);
        hash.insert(Vec3::new(100.0, 0.0, 100.0), 7);
        let mut seen = Vec::new();
        hash.for_each_in_neighborhood(Vec3::ZERO, |e| seen.push(e.agent_id));
        assert!(seen.is_empty());
    }

    #[test]
    fn concurrent_inserts_are_all_observed() {
        let hash = SpatialHash::new(2.0);
        (0..2000u32).into_par_iter().for_each(|i| {
            let p = Vec3::new((i % 37) as f32, 0.0, (i / 37) as f32);
            hash.insert(p, i);
        });
        assert_eq!(hash.total_entries(), 2000);
    }

    #[test]
    fn negative_coordinates_hash_consistently() {
        let hash = SpatialHash::new(5.0);
        hash.insert(Vec3::new(-12.0, 0.0, -3.0), 42);
        let mut seen = Vec::new();
        hash.for_each_in_neighborhood(Vec3::new(-11.0, 0.0, -2.0), |e| seen.push(e.agent_id));
        assert_eq!(seen, vec![42]);
    }
}
