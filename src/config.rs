//! World configuration, shared read-only with bodies during a step.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

/// Pixels per meter: 70 pixels is about a quarter meter.
pub const METERS_TO_PIXELS: f32 = 70.0 / 0.25;

/// How bodies gather the boxes they resolve against each step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Every registered box (O(n) per body).
    #[default]
    Linear,
    /// Quad tree query over the body's swept region.
    Indexed,
}

/// World-level configuration for the physics world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Global gravity in m/s², applied unless a body overrides it.
    pub gravity: Vec3,
    /// Global wind in m/s², added to every body's acceleration.
    pub wind: Vec3,
    /// World limits in pixels: `[0, width] x [0, height]`.
    pub world_width: f32,
    pub world_height: f32,
    /// Unit conversion between body positions (meters) and bounds (pixels).
    pub meters_to_pixels: f32,
    /// Highest ledge, in pixels, a body walks onto instead of stopping.
    pub step_limit: f32,
    /// Side of the square region covered by the quad tree, in pixels.
    pub tree_size: f32,
    /// Quad tree depth; nodes at `max_depth - 1` are leaves.
    pub max_depth: u32,
    pub candidate_source: CandidateSource,
    /// Maximum number of events a single update may buffer; extra are dropped.
    pub max_events: usize,
    /// Enable internal timing instrumentation (adds small overhead when true).
    pub enable_timing: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            wind: Vec3::ZERO,
            world_width: 10_000.0,
            world_height: 10_000.0,
            meters_to_pixels: METERS_TO_PIXELS,
            step_limit: 10.0,
            tree_size: 10_000.0,
            max_depth: 8,
            candidate_source: CandidateSource::Linear,
            max_events: 4096,
            enable_timing: false,
        }
    }
}

/// Deepest quad tree whose leaves are still at least 1 px wide.
pub fn max_depth_for(tree_size: f32) -> u32 {
    if tree_size.is_finite() && tree_size >= 1.0 {
        1 + tree_size.log2().floor() as u32
    } else {
        1
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("meters_to_pixels", self.meters_to_pixels),
            ("tree_size", self.tree_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.step_limit.is_finite() && self.step_limit >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "step_limit must be non-negative, got {}",
                self.step_limit
            )));
        }
        if self.max_depth == 0 {
            return Err(PhysicsError::InvalidConfig("max_depth must be at least 1".into()));
        }
        let limit = max_depth_for(self.tree_size);
        if self.max_depth > limit {
            return Err(PhysicsError::InvalidConfig(format!(
                "max_depth {} makes leaves smaller than 1px for tree_size {}; at most {limit}",
                self.max_depth, self.tree_size
            )));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite".into()));
        }
        if !self.wind.is_finite() {
            return Err(PhysicsError::InvalidConfig("wind must be finite".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, PhysicsError> {
        let cfg: WorldConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_string(&self) -> Result<String, PhysicsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[inline]
    pub fn pixels_to_meters(&self) -> f32 {
        1.0 / self.meters_to_pixels
    }
}
