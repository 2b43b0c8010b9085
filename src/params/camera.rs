//! Camera configuration and presets.

use serde::{Deserialize, Serialize};

/// Stationary camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCamera {
    /// Camera position (world units)
    pub position: [f32; 3],

    /// Look-at target (world units)
    pub target: [f32; 3],
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 100.0], // Far enough to frame radius + max bass + noise
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Camera circling the origin in the XZ plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitCamera {
    /// Orbit radius (world units)
    pub distance: f32,

    /// Height above the XZ plane (world units)
    pub elevation: f32,

    /// Angular speed (radians per second)
    pub speed_rad_per_s: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            distance: 100.0,
            elevation: 20.0,
            speed_rad_per_s: 0.1,
        }
    }
}

/// Camera preset selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraPreset {
    /// Fixed preset: stationary camera facing the origin
    Fixed(FixedCamera),

    /// Orbit preset: slow circle around the mesh
    Orbit(OrbitCamera),
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self::Fixed(FixedCamera::default())
    }
}
