//! Engine configuration.
//!
//! Mirrors the teacher's RON-based `GameConfig` (a plain `serde`-deserializable
//! struct loaded from a `.ron` document), minus the Bevy asset-server
//! indirection a standalone library has no use for: [`EngineConfig::from_ron_str`]
//! parses a document directly, and [`EngineConfig::validate`] is run eagerly by
//! [`crate::engine::CrowdEngine::new`] rather than deferred to a later system.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Falloff/damping constant bundle. Two incompatible tunings of the movement
/// system coexist in the source this crate was distilled from; both are kept
/// as an explicit, named choice rather than silently picking one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorProfile {
    /// Linear separation falloff, damping constant k=3.
    Legacy,
    /// Quadratic separation falloff, damping constant k=4, with per-agent jitter.
    Natural,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        BehaviorProfile::Natural
    }
}

impl BehaviorProfile {
    /// Damping stiffness `k` in `v' = lerp(v, desired, dt * k)`.
    pub fn damping_k(self) -> f32 {
        match self {
            BehaviorProfile::Legacy => 3.0,
            BehaviorProfile::Natural => 4.0,
        }
    }

    pub fn jitter_enabled(self) -> bool {
        matches!(self, BehaviorProfile::Natural)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_size: f32,
    pub grid_origin: Vec3,

    pub obstacle_cost: u8,
    pub default_cost: u8,
    /// Advisory smoothing factor in `[0, 1]` for a future smoothed direction
    /// sample; the field-build stages themselves are unaffected by it.
    pub direction_smooth_factor: f32,

    pub pool_size: usize,

    pub avoid_radius: f32,
    pub cohesion_radius: f32,
    /// Spatial-hash cell size. `None` defaults to `max(avoid_radius, cohesion_radius)`.
    pub spatial_cell_size: Option<f32>,

    pub profile: BehaviorProfile,

    /// Seeds the per-agent jitter RNG (`BehaviorProfile::Natural` only).
    pub jitter_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_width: 64,
            grid_height: 64,
            cell_size: 1.0,
            grid_origin: Vec3::ZERO,
            obstacle_cost: 255,
            default_cost: 1,
            direction_smooth_factor: 0.0,
            pool_size: 1024,
            avoid_radius: 1.0,
            cohesion_radius: 5.0,
            spatial_cell_size: None,
            profile: BehaviorProfile::Natural,
            jitter_seed: 0,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, EngineError> {
        ron::from_str(s).map_err(|e| EngineError::InvalidConfiguration(format!("RON parse error: {e}")))
    }

    /// Effective spatial-hash cell size: the configured value, or the larger
    /// of the two flocking radii when unset (per §4.6 of the specification).
    pub fn effective_spatial_cell_size(&self) -> f32 {
        self.spatial_cell_size
            .unwrap_or_else(|| self.avoid_radius.max(self.cohesion_radius))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(EngineError::InvalidConfiguration(
                "grid_width and grid_height must be positive".into(),
            ));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(EngineError::InvalidConfiguration(
                "cell_size must be a positive finite number".into(),
            ));
        }
        if !self.grid_origin.is_finite() {
            return Err(EngineError::InvalidConfiguration(
                "grid_origin must have finite components".into(),
            ));
        }
        if self.pool_size == 0 {
            return Err(EngineError::InvalidConfiguration("pool_size must be positive".into()));
        }
        if !(self.avoid_radius.is_finite() && self.avoid_radius > 0.0) {
            return Err(EngineError::InvalidConfiguration(
                "avoid_radius must be a positive finite number".into(),
            ));
        }
        if !(self.cohesion_radius.is_finite() && self.cohesion_radius > 0.0) {
            return Err(EngineError::InvalidConfiguration(
                "cohesion_radius must be a positive finite number".into(),
            ));
        }
        if let Some(s) = self.spatial_cell_size {
            if !(s.is_finite() && s > 0.0) {
                return Err(EngineError::InvalidConfiguration(
                    "spatial_cell_size must be a positive finite number".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_grid_dims_rejected() {
        let mut c = EngineConfig::default();
        c.grid_width = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn non_finite_origin_rejected() {
        let mut c = EngineConfig::default();
        c.grid_origin = Vec3::new(f32::NAN, 0.0, 0.0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_pool_size_rejected() {
        let mut c = EngineConfig::default();
        c.pool_size = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn spatial_cell_size_defaults_to_larger_radius() {
        let mut c = EngineConfig::default();
        c.avoid_radius = 2.0;
        c.cohesion_radius = 5.0;
        assert_eq!(c.effective_spatial_cell_size(), 5.0);
    }

    #[test]
    fn from_ron_str_round_trips_default() {
        let c = EngineConfig::default();
        let doc = ron::to_string(&c).unwrap();
        let parsed = EngineConfig::from_ron_str(&doc).unwrap();
        assert_eq!(parsed.grid_width, c.grid_width);
        assert_eq!(parsed.pool_size, c.pool_size);
    }
}
