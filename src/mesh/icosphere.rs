//! Subdivided icosahedron generator.

use std::collections::HashMap;

use glam::Vec3;

use super::{Mesh, Vertex};

/// 1 / sqrt(1 + PHI^2)
const N: f32 = 0.525_731_1;
/// PHI / sqrt(1 + PHI^2)
const P: f32 = 0.850_650_8;

/// Base icosahedron vertices (unit length)
const BASE_VERTICES: [[f32; 3]; 12] = [
    [-N, P, 0.0],
    [N, P, 0.0],
    [-N, -P, 0.0],
    [N, -P, 0.0],
    [0.0, -N, P],
    [0.0, N, P],
    [0.0, -N, -P],
    [0.0, N, -P],
    [P, 0.0, -N],
    [P, 0.0, N],
    [-P, 0.0, -N],
    [-P, 0.0, N],
];

/// Base icosahedron faces, counter-clockwise seen from outside
const BASE_FACES: [[u32; 3]; 20] = [
    // 5 faces around vertex 0
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    // 5 adjacent faces
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    // 5 faces around vertex 3
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    // 5 bottom faces
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

impl Mesh {
    /// Closed icosphere of `radius`, subdivided `detail` times.
    ///
    /// Each level splits every triangle into four and projects the new edge
    /// midpoints onto the sphere. Shared midpoints are created once, giving
    /// `10 * 4^detail + 2` vertices and `20 * 4^detail` triangles.
    pub fn icosphere(radius: f32, detail: u32) -> Self {
        let mut directions: Vec<Vec3> = BASE_VERTICES.iter().map(|&v| Vec3::from(v)).collect();
        let mut faces: Vec<[u32; 3]> = BASE_FACES.to_vec();

        for _ in 0..detail {
            faces = subdivide_once(&mut directions, &faces);
        }

        let vertices: Vec<Vertex> = directions
            .iter()
            .map(|d| Vertex {
                position: (*d * radius).to_array(),
                normal: d.to_array(),
            })
            .collect();

        Self {
            normal_scratch: Vec::with_capacity(vertices.len()),
            vertices,
            directions,
            indices: faces.into_iter().flatten().collect(),
            base_radius: radius,
            rotation: Vec3::ZERO,
            revision: 0,
        }
    }
}

/// Perform a single subdivision pass over unit directions
fn subdivide_once(directions: &mut Vec<Vec3>, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
    // Edge key: sorted pair of vertex indices
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::with_capacity(faces.len() * 3 / 2);
    let mut next = Vec::with_capacity(faces.len() * 4);

    let mut midpoint = |a: u32, b: u32, directions: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *midpoints.entry(key).or_insert_with(|| {
            let mid = (directions[a as usize] + directions[b as usize]).normalize();
            directions.push(mid);
            (directions.len() - 1) as u32
        })
    };

    for &[v0, v1, v2] in faces {
        let m01 = midpoint(v0, v1, directions);
        let m12 = midpoint(v1, v2, directions);
        let m20 = midpoint(v2, v0, directions);

        next.push([v0, m01, m20]);
        next.push([v1, m12, m01]);
        next.push([v2, m20, m12]);
        next.push([m01, m12, m20]);
    }

    next
}
