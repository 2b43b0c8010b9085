//! Closed, radially displaceable mesh with GPU-ready vertex layout.

mod icosphere;
mod normals;

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Vec3};

use crate::error::ConfigError;

/// Vertex data for the morph mesh (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangle mesh owned and mutated by the morph engine.
///
/// Positions and normals are interleaved in `Vertex`, so their lengths can
/// never diverge after construction. `revision` increases on every mutation
/// of the vertex buffer; renderers compare it to decide whether to re-upload.
///
/// Each vertex also keeps the unit direction it had at construction.
/// Radial displacement is always measured along that direction, never along
/// the current position, so a negative distance cannot flip a vertex for
/// later frames.
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    /// Unit direction of each vertex at construction (zero at the origin)
    directions: Vec<Vec3>,
    indices: Vec<u32>,
    base_radius: f32,
    /// Euler angles (radians), applied X then Y then Z
    rotation: Vec3,
    revision: u64,
    /// Reused accumulator for normal recomputation
    normal_scratch: Vec<Vec3>,
}

impl Mesh {
    /// Build a mesh from separate position and normal buffers.
    ///
    /// Fails if the buffers disagree in length or the triangle list is
    /// malformed.
    pub fn from_parts(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
        base_radius: f32,
    ) -> Result<Self, ConfigError> {
        if positions.len() != normals.len() {
            return Err(ConfigError::MeshMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(ConfigError::RaggedTriangles(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(ConfigError::InvalidIndex {
                index,
                vertex_count: positions.len(),
            });
        }
        if !base_radius.is_finite() || base_radius <= 0.0 {
            return Err(ConfigError::invalid(
                "base_radius",
                format!("must be a positive finite number, got {base_radius}"),
            ));
        }

        let vertices = positions
            .iter()
            .zip(&normals)
            .map(|(p, n)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect::<Vec<_>>();

        Ok(Self {
            normal_scratch: Vec::with_capacity(vertices.len()),
            directions: positions.iter().map(|p| p.normalize_or_zero()).collect(),
            vertices,
            indices,
            base_radius,
            rotation: Vec3::ZERO,
            revision: 0,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Fixed unit direction of every vertex
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Move every vertex to `direction * distance(direction)`.
    ///
    /// Vertices without a direction stay where they are. Bumps the revision
    /// but leaves normals untouched.
    pub fn displace_radially(&mut self, mut distance: impl FnMut(Vec3) -> f32) {
        for (vertex, &direction) in self.vertices.iter_mut().zip(&self.directions) {
            if direction == Vec3::ZERO {
                continue;
            }
            vertex.position = (direction * distance(direction)).to_array();
        }
        self.mark_dirty();
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Undisplaced sphere radius
    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.vertices[index].position)
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.vertices[index].normal)
    }

    /// Distance of every vertex from the origin
    pub fn radial_distances(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).length())
            .collect()
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Add an Euler increment to the current rotation
    pub fn rotate_by(&mut self, delta: Vec3) {
        self.rotation += delta;
    }

    /// Object-to-world transform from the accumulated rotation
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Flag the vertex buffer for re-upload
    pub fn mark_dirty(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Changes every time the vertex buffer is modified
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Unique undirected edges, sorted, for wireframe drawing
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut edges: Vec<[u32; 2]> = self
            .indices
            .chunks_exact(3)
            .flat_map(|tri| [[tri[0], tri[1]], [tri[1], tri[2]], [tri[2], tri[0]]])
            .map(|[a, b]| if a < b { [a, b] } else { [b, a] })
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }
}
