//! Rendering configuration.

use serde::{Deserialize, Serialize};

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Base surface colour (linear RGB)
    pub mesh_color: [f32; 3],

    /// Wireframe overlay colour (linear RGB)
    pub wire_color: [f32; 3],

    /// Direction light travels towards (normalized in the shader)
    pub light_direction: [f32; 3],

    /// Draw the triangle edges on top of the shaded mesh
    pub wireframe: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            mesh_color: [0.55, 0.25, 0.85],
            wire_color: [0.95, 0.95, 1.0],
            light_direction: [-0.4, -1.0, -0.6],
            wireframe: true,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}
