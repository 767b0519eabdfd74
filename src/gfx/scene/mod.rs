//! # Scene Management Module
//!
//! Scene graph types: the [`Scene`] container, the [`SceneObject`]s it draws,
//! their [`Mesh`] geometry and the vertex types underneath.
//!
//! ## Key Components
//!
//! - [`Scene`] - Objects in draw order, camera, lights and the frame clock
//! - [`SceneObject`] - Mesh + material placed by translation, rotation and scale
//! - [`Mesh`] - Validated vertices and triangles with derived upload buffers
//! - [`Vertex`] / [`VertexLayout`] - Per-vertex data and its interleaving
//!
//! ## Usage
//!
//! ```no_run
//! use orrery::gfx::camera::Camera;
//! use orrery::gfx::scene::Scene;
//! use orrery::gfx::shapes;
//!
//! let mut scene = Scene::new(Camera::new(1.5));
//! let cube = shapes::cube().unwrap();
//! let id = scene.add_object(cube);
//! scene.update();
//! scene.delete_object(id);
//! ```

pub mod light;
pub mod mesh;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::PointLight;
pub use mesh::Mesh;
pub use object::{ObjectHook, SceneObject};
pub use scene::Scene;
pub use vertex::{ScalarType, Vertex, VertexAttribute, VertexLayout, VertexSemantic};
