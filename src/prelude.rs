//! # Orrery Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use orrery::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = orrery::default();
//!     app.scene_mut().add_object(shapes::sphere(25)?);
//!     app.scene_mut().add_light(PointLight::new(0.0, 3.0, 3.0));
//!     app.run()?;
//!     Ok(())
//! }
//! ```

// Core application types
pub use crate::app::{AppConfig, OrreryApp};
pub use crate::default;
pub use crate::errors::{RenderError, Result};

// Scene and graphics types
pub use crate::gfx::camera::Camera;
pub use crate::gfx::controller::{
    AddShapeController, Controller, InputEvent, OrbitController, PointerEvent,
};
pub use crate::gfx::geometry::{BoxGeometry, ParameterizedGeometry, SphereGeometry};
pub use crate::gfx::rendering::{GraphicsApi, Renderer, WgpuBackend};
pub use crate::gfx::resources::{Material, MaterialValue, ShaderProgram, Texture};
pub use crate::gfx::scene::{Mesh, PointLight, Scene, SceneObject, Vertex, VertexLayout};
pub use crate::gfx::shapes;

// Math
pub use crate::math::{to_cartesian, to_spherical, SphericalCoord};
pub use cgmath::{InnerSpace, Vector3};
