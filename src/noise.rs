//! Coherent noise field sampled by the morph engine.
//!
//! The permutation table is built once from the seed and never mutated,
//! so sampling is a pure function of the coordinate.

use glam::DVec3;
use noise::{NoiseFn, OpenSimplex, Perlin};

use crate::params::NoiseKind;

/// Deterministic 3D noise in roughly [-1, 1]
pub struct NoiseField {
    source: Box<dyn NoiseFn<f64, 3> + Send + Sync>,
}

impl NoiseField {
    /// Create noise field of the given kind with seed
    pub fn new(kind: NoiseKind, seed: u32) -> Self {
        match kind {
            NoiseKind::Simplex => Self::from_source(OpenSimplex::new(seed)),
            NoiseKind::Perlin => Self::from_source(Perlin::new(seed)),
        }
    }

    /// Wrap any 3D `noise` function
    pub fn from_source<N>(source: N) -> Self
    where
        N: NoiseFn<f64, 3> + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
        }
    }

    /// Sample 3D noise at position
    pub fn sample(&self, point: DVec3) -> f32 {
        self.source.get(point.to_array()) as f32
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").finish_non_exhaustive()
    }
}
