//! # Primitive Shape Generation
//!
//! Box and sphere generators. Boxes have unshared vertices per face so each
//! face keeps a flat normal; spheres are a latitude/longitude grid with
//! smooth normals.

use cgmath::{InnerSpace, Vector3};
use std::f32::consts::PI;

use super::ParameterizedGeometry;
use crate::errors::Result;
use crate::gfx::scene::mesh::Mesh;
use crate::gfx::scene::vertex::{Vertex, VertexAttribute, VertexLayout, VertexSemantic};
use crate::math::{to_cartesian, SphericalCoord};

/// Axis-aligned box centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

// (normal, u axis, v axis) per face, in emission order.
// u x v == normal, so corners walked (-,-) (+,-) (+,+) (-,+) wind outward.
const BOX_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    // back
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    // top
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    // front
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    // bottom
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    // right
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    // left
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
];

const FACE_CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

impl ParameterizedGeometry for BoxGeometry {
    /// Boxes have a fixed tessellation; `detail_level` is ignored.
    fn calculate_mesh(&self, _detail_level: u32) -> Result<Mesh> {
        let half = Vector3::new(self.width, self.height, self.depth) * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut triangles = Vec::with_capacity(12);

        for (face, (normal, u, v)) in BOX_FACES.iter().enumerate() {
            let n = Vector3::from(*normal);
            let u = Vector3::from(*u);
            let v = Vector3::from(*v);

            for (&(su, sv), uv) in FACE_CORNERS.iter().zip(FACE_UVS) {
                let corner = n + u * su + v * sv;
                let position = [corner.x * half.x, corner.y * half.y, corner.z * half.z];
                vertices.push(
                    Vertex::new(position)
                        .with_normal(*normal)
                        .with_texture_coord(uv),
                );
            }

            let base = (face * 4) as u32;
            triangles.push([base, base + 1, base + 2]);
            triangles.push([base, base + 2, base + 3]);
        }

        let layout = VertexLayout::new(vec![
            VertexAttribute::new(VertexSemantic::Position, false),
            VertexAttribute::new(VertexSemantic::Normal, true),
            VertexAttribute::new(VertexSemantic::TextureCoord, false),
        ]);
        Mesh::new(vertices, triangles, layout)
    }
}

/// Sphere of the given radius centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
}

impl SphereGeometry {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl ParameterizedGeometry for SphereGeometry {
    /// Builds a `(n+1) x (n+1)` grid over polar angle and azimuth with
    /// `n = detail_level` (at least 1) and two triangles per cell. The cells
    /// touching the poles produce zero-area triangles.
    fn calculate_mesh(&self, detail_level: u32) -> Result<Mesh> {
        let n = detail_level.max(1);
        let row = n + 1;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        for i in 0..=n {
            let theta = i as f32 * PI / n as f32;
            for j in 0..=n {
                let phi = j as f32 * 2.0 * PI / n as f32;
                let p = to_cartesian(SphericalCoord::new(self.radius, theta, phi));
                vertices.push(Vertex::new(p.into()).with_normal(p.normalize().into()));
            }
        }

        let mut triangles = Vec::with_capacity((2 * n * n) as usize);
        for i in 0..n {
            for j in 0..n {
                let top_left = i * row + j;
                let bottom_left = (i + 1) * row + j;
                let bottom_right = bottom_left + 1;
                let top_right = top_left + 1;
                triangles.push([top_left, bottom_left, bottom_right]);
                triangles.push([top_left, bottom_right, top_right]);
            }
        }

        Mesh::new(vertices, triangles, VertexLayout::position_normal())
    }
}
