//! # Graphics Module
//!
//! Everything needed to describe a scene and get it on screen.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - Perspective camera with look-at and update hooks
//! - **Controllers** ([`controller`]) - Pointer input turned into scene edits
//! - **Geometry** ([`geometry`]) - Procedural box and sphere meshes
//! - **Rendering** ([`rendering`]) - Lazy GPU resource creation and the frame loop
//! - **Resources** ([`resources`]) - Buffers, shaders, textures and materials
//! - **Scene** ([`scene`]) - Objects, lights and the frame clock
//! - **Shapes** ([`shapes`]) - Ready-made objects and their WGSL programs
//!
//! ## Usage
//!
//! ```no_run
//! use orrery::gfx::{camera::Camera, scene::{PointLight, Scene}, shapes};
//!
//! let mut scene = Scene::new(Camera::new(1200.0 / 800.0));
//! scene.add_light(PointLight::new(0.0, 3.0, 3.0));
//! scene.add_object(shapes::sphere(25).unwrap());
//! // The app owns a `Renderer<WgpuBackend>` and calls `draw_scene` once per frame.
//! ```

pub mod camera;
pub mod controller;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod shapes;

// Re-export commonly used types
pub use camera::Camera;
pub use rendering::{Renderer, WgpuBackend};
pub use scene::{Scene, SceneObject};
