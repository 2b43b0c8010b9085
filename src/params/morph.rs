//! Morph engine parameters: displacement, noise drift and idle rotation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Closed numeric interval used for modulation input and output ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Signed width (`max - min`)
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// Per-tick rotation increments (radians per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationDeltas {
    /// Rotation about X
    pub pitch: f32,

    /// Rotation about Y
    pub yaw: f32,

    /// Rotation about Z
    pub roll: f32,
}

impl Default for RotationDeltas {
    fn default() -> Self {
        Self {
            pitch: 0.003,
            yaw: 0.005,
            roll: -0.001,
        }
    }
}

impl RotationDeltas {
    /// Deltas as an XYZ Euler increment
    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.pitch, self.yaw, self.roll)
    }
}

/// Coherent noise algorithm backing the noise field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    #[default]
    Simplex,
    Perlin,
}

/// Mesh morph parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphParams {
    /// Undisplaced sphere radius (world units)
    pub base_radius: f32,

    /// Noise displacement gain (world units per unit treble per unit noise)
    /// Formula: distance = radius + bass + noise * amplitude * treble * 2
    pub amplitude: f32,

    /// Per-axis noise drift weights (x, y, z)
    pub noise_axis_weights: [f32; 3],

    /// Noise drift per elapsed millisecond
    pub noise_rate_factor: f64,

    /// Idle rotation applied every tick regardless of playback
    pub rotation_per_tick: RotationDeltas,

    /// Input range both features are expected to occupy
    pub feature_input: ValueRange,

    /// Bass modulation target range (world units added to the radius)
    pub bass_output: ValueRange,

    /// Treble modulation target range (noise gain)
    pub treble_output: ValueRange,

    /// Power curve applied to the bass feature before modulation (< 1 boosts small values)
    pub bass_exponent: f32,

    /// Icosphere subdivision level (0 = 12 vertices, each level ~4x more faces)
    pub mesh_detail: u32,

    /// Noise algorithm
    pub noise: NoiseKind,

    /// Noise seed
    pub noise_seed: u32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            base_radius: 10.0,
            amplitude: 5.0,
            noise_axis_weights: [4.0, 6.0, 7.0],
            noise_rate_factor: 1e-5,
            rotation_per_tick: RotationDeltas::default(),
            feature_input: ValueRange::new(0.0, 1.0),
            bass_output: ValueRange::new(0.0, 8.0),
            treble_output: ValueRange::new(0.0, 4.0),
            bass_exponent: 0.8,
            mesh_detail: 4,
            noise: NoiseKind::Simplex,
            noise_seed: 42,
        }
    }
}

/// Highest subdivision level accepted (10 * 4^7 + 2 = 163,842 vertices)
pub const MAX_MESH_DETAIL: u32 = 7;

impl MorphParams {
    /// Validate ranges that would otherwise produce NaN geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_radius.is_finite() || self.base_radius <= 0.0 {
            return Err(ConfigError::invalid(
                "base_radius",
                format!("must be a positive finite number, got {}", self.base_radius),
            ));
        }
        if !self.amplitude.is_finite() {
            return Err(ConfigError::invalid("amplitude", "must be finite"));
        }
        if self.noise_axis_weights.iter().any(|w| !w.is_finite()) {
            return Err(ConfigError::invalid("noise_axis_weights", "must be finite"));
        }
        if !self.noise_rate_factor.is_finite() {
            return Err(ConfigError::invalid("noise_rate_factor", "must be finite"));
        }
        if !self.rotation_per_tick.as_vec3().is_finite() {
            return Err(ConfigError::invalid("rotation_per_tick", "must be finite"));
        }
        if !self.bass_exponent.is_finite() || self.bass_exponent <= 0.0 {
            return Err(ConfigError::invalid(
                "bass_exponent",
                format!("must be positive, got {}", self.bass_exponent),
            ));
        }
        if self.mesh_detail > MAX_MESH_DETAIL {
            return Err(ConfigError::invalid(
                "mesh_detail",
                format!("must be at most {MAX_MESH_DETAIL}, got {}", self.mesh_detail),
            ));
        }
        for (name, range) in [
            ("bass_output", self.bass_output),
            ("treble_output", self.treble_output),
        ] {
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(ConfigError::invalid(name, "bounds must be finite"));
            }
        }
        // Zero-width input range is caught when the modulators are built
        Ok(())
    }
}
