// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! [`Renderer`] manages GPU resource lifetimes and the per-frame draw loop
//! against any [`GraphicsApi`]. [`WgpuBackend`] is the production backend.

pub mod backend;
pub mod gpu_texture;
pub mod renderer;
pub mod wgpu_backend;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use backend::{GraphicsApi, ResourceHandle};
pub use gpu_texture::GpuTexture;
pub use renderer::Renderer;
pub use wgpu_backend::WgpuBackend;
