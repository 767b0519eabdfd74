//! # Procedural Geometry Generation
//!
//! Shapes that build a [`Mesh`] from a handful of parameters, so basic
//! primitives don't need model files.
//!
//! ## Supported Primitives
//!
//! - **Box**: width/height/depth, 24 vertices and 12 triangles
//! - **Sphere**: radius plus a detail level controlling the grid resolution
//!
//! ## Usage
//!
//! ```rust
//! use orrery::gfx::geometry::{BoxGeometry, ParameterizedGeometry, SphereGeometry};
//!
//! let cube = BoxGeometry::new(2.0, 2.0, 2.0).calculate_mesh(0).unwrap();
//! let sphere = SphereGeometry::new(1.0).calculate_mesh(32).unwrap();
//! assert_eq!(cube.triangles().len(), 12);
//! assert_eq!(sphere.vertices().len(), 33 * 33);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::errors::Result;
use crate::gfx::scene::mesh::Mesh;

/// A shape that can produce a mesh at a given level of detail.
pub trait ParameterizedGeometry {
    fn calculate_mesh(&self, detail_level: u32) -> Result<Mesh>;
}
