//! Audio-reactive radial displacement of the mesh.

use glam::{DVec3, Vec3};

use crate::mesh::Mesh;
use crate::noise::NoiseField;
use crate::params::MorphParams;
use crate::spectrum::BandSignals;

/// Per-frame mesh transform: idle rotation plus noise-driven displacement.
///
/// The engine holds no per-frame state. Every displacement re-derives each
/// vertex's distance from its fixed base direction, the current signals and
/// the current noise sample, so the shape cannot drift over time.
#[derive(Debug)]
pub struct MeshMorphEngine {
    noise: NoiseField,
    amplitude: f32,
    /// Noise drift per elapsed millisecond on each axis
    drift_per_ms: DVec3,
    rotation_per_tick: Vec3,
}

impl MeshMorphEngine {
    /// Create engine with morph parameters and a noise field
    pub fn new(params: &MorphParams, noise: NoiseField) -> Self {
        let [wx, wy, wz] = params.noise_axis_weights;
        Self {
            noise,
            amplitude: params.amplitude,
            drift_per_ms: DVec3::new(wx as f64, wy as f64, wz as f64) * params.noise_rate_factor,
            rotation_per_tick: params.rotation_per_tick.as_vec3(),
        }
    }

    /// Advance the mesh rotation by one tick's deltas
    pub fn rotate(&self, mesh: &mut Mesh) {
        mesh.rotate_by(self.rotation_per_tick);
    }

    /// Noise coordinate offset at `elapsed_ms`
    pub fn noise_offset(&self, elapsed_ms: f64) -> DVec3 {
        self.drift_per_ms * elapsed_ms
    }

    /// Distance from the origin for a vertex whose noise sample is `noise_val`
    pub fn target_distance(&self, base_radius: f32, signals: BandSignals, noise_val: f32) -> f32 {
        (base_radius + signals.bass_frequency)
            + noise_val * self.amplitude * signals.treble_frequency * 2.0
    }

    /// Displace every vertex radially, then refresh normals.
    ///
    /// Each vertex moves along the base direction it had when the mesh was
    /// built, so the previous frame's displacement is discarded rather than
    /// compounded. A negative distance puts the vertex on the far side of
    /// the origin for this frame only. A vertex built at the origin has no
    /// direction and is left where it is.
    pub fn displace(&self, mesh: &mut Mesh, signals: BandSignals, elapsed_ms: f64) {
        let offset = self.noise_offset(elapsed_ms);
        let base_radius = mesh.base_radius();

        mesh.displace_radially(|direction| {
            let noise_val = self.noise.sample(direction.as_dvec3() + offset);
            self.target_distance(base_radius, signals, noise_val)
        });
        mesh.recompute_normals();
    }
}
