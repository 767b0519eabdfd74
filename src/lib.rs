// src/lib.rs
//! Orrery
//!
//! A small real-time 3D scene renderer built on wgpu and winit: procedural
//! meshes, materials, a look-at camera with orbit controls, and a resource
//! manager that uploads each GPU object once and rebinds it every frame.

pub mod app;
pub mod errors;
pub mod gfx;
pub mod math;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{AppConfig, OrreryApp};
pub use errors::{RenderError, Result};

/// Creates an application with the default configuration
pub fn default() -> OrreryApp {
    OrreryApp::new(AppConfig::default())
}
