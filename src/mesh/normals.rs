//! Vertex normal recomputation after displacement.

use glam::Vec3;

use super::Mesh;

impl Mesh {
    /// Recompute smooth vertex normals from the triangle list.
    ///
    /// Each vertex normal is the normalized sum of the unnormalized face
    /// normals of its adjacent triangles, so larger faces weigh more. A vertex
    /// whose faces cancel out (or that has none) falls back to its base
    /// direction.
    pub fn recompute_normals(&mut self) {
        self.normal_scratch.clear();
        self.normal_scratch.resize(self.vertices.len(), Vec3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = Vec3::from_array(self.vertices[a].position);
            let p1 = Vec3::from_array(self.vertices[b].position);
            let p2 = Vec3::from_array(self.vertices[c].position);

            // Cross product length is twice the triangle area
            let face = (p1 - p0).cross(p2 - p0);
            self.normal_scratch[a] += face;
            self.normal_scratch[b] += face;
            self.normal_scratch[c] += face;
        }

        for ((vertex, &sum), &direction) in self
            .vertices
            .iter_mut()
            .zip(&self.normal_scratch)
            .zip(&self.directions)
        {
            vertex.normal = sum.try_normalize().unwrap_or(direction).to_array();
        }
    }
}
