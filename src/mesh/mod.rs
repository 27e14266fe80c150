//! Mesh module - triangle lists consumed by the rasterizer
//!
//! A mesh is a flat list of corners; every three consecutive corners form a
//! triangle. Corners index into shared position/normal/texcoord pools.

mod obj;

pub use obj::*;

use crate::rasterizer::{Vec2, Vec3, Vertex};

/// One triangle corner: indices into the mesh attribute pools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub normal: usize,
    /// None when the source had no texture coordinate
    pub texcoord: Option<usize>,
}

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub corners: Vec<Corner>,
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.corners.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }

    /// Resolve corner `i` to a full vertex
    pub fn vertex(&self, i: usize) -> Vertex {
        let c = self.corners[i];
        Vertex::new(
            self.positions[c.position],
            self.normals[c.normal],
            c.texcoord.map_or(Vec2::ZERO, |t| self.texcoords[t]),
        )
    }

    /// Iterate triangles as groups of three vertices
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let i = t * 3;
            [self.vertex(i), self.vertex(i + 1), self.vertex(i + 2)]
        })
    }

    /// Create a cube spanning [-1, 1] on each axis.
    ///
    /// Faces wind counter-clockwise seen from outside, so back faces are
    /// rejected by the rasterizer's coverage test.
    pub fn cube() -> Self {
        let mut mesh = Self::new("cube");

        let positions = [
            // Front face
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            // Back face
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            // Top face
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
            // Bottom face
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            // Right face
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            // Left face
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ];

        let normals = [
            Vec3::new(0.0, 0.0, 1.0),  // Front
            Vec3::new(0.0, 0.0, -1.0), // Back
            Vec3::new(0.0, 1.0, 0.0),  // Top
            Vec3::new(0.0, -1.0, 0.0), // Bottom
            Vec3::new(1.0, 0.0, 0.0),  // Right
            Vec3::new(-1.0, 0.0, 0.0), // Left
        ];

        mesh.positions = positions.to_vec();
        mesh.normals = normals.to_vec();
        mesh.texcoords = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        // Two triangles per face
        for face in 0..6 {
            let base = face * 4;
            for i in [0, 1, 2, 0, 2, 3] {
                mesh.corners.push(Corner {
                    position: base + i,
                    normal: face,
                    texcoord: Some(i),
                });
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.triangles().count(), 12);
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let cube = Mesh::cube();
        for [a, b, c] in cube.triangles() {
            let n = (b.pos - a.pos).cross(c.pos - a.pos);
            assert!(n.dot(a.normal) > 0.0);
        }
    }

    #[test]
    fn test_vertex_resolves_attributes() {
        let cube = Mesh::cube();
        let v = cube.vertex(4);
        assert_eq!(v.pos, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(v.normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(v.uv, Vec2::new(1.0, 1.0));
    }
}
