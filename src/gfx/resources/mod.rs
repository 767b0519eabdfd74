// src/gfx/resources/mod.rs
//! GPU-backed resources
//!
//! CPU-side descriptions of buffers, shaders, textures and materials. Each
//! carries a [`GpuResource`] that the renderer moves from uninitialized to
//! created.

pub mod buffer;
pub mod gpu_resource;
pub mod material;
pub mod shader;
pub mod texture;

// Re-export main types
pub use buffer::{IndexBuffer, VertexBuffer};
pub use gpu_resource::{GpuResource, ResourceKind, ResourceState};
pub use material::{Material, MaterialKind, MaterialProperty, MaterialValue};
pub use shader::{Shader, ShaderProgram, ShaderStage, UniformKind, UniformLayout};
pub use texture::Texture;
