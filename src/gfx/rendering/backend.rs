//! # Graphics API boundary
//!
//! The renderer only talks to the GPU through [`GraphicsApi`]. The trait is
//! deliberately narrow and GL-shaped: create and upload objects, bind them,
//! set int/vec4/mat4 uniforms by name and submit indexed triangle draws.
//! [`WgpuBackend`](super::wgpu_backend::WgpuBackend) implements it on wgpu;
//! tests use an in-memory recorder.

use crate::errors::Result;
use crate::gfx::resources::gpu_resource::ResourceKind;
use crate::gfx::resources::shader::{ShaderStage, UniformLayout};
use crate::gfx::scene::vertex::VertexLayout;

/// Opaque handle issued by a backend for an object it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub u64);

pub trait GraphicsApi {
    // Creation and upload
    fn create_vertex_buffer(&mut self, data: &[u8]) -> Result<ResourceHandle>;
    fn create_index_buffer(&mut self, data: &[u8]) -> Result<ResourceHandle>;
    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ResourceHandle>;
    fn create_program(
        &mut self,
        vertex: ResourceHandle,
        fragment: ResourceHandle,
        uniforms: &UniformLayout,
    ) -> Result<ResourceHandle>;
    /// Ties a vertex layout to a program. The returned handle names the
    /// resulting configuration and is what [`bind_vertex_layout`] takes.
    ///
    /// [`bind_vertex_layout`]: GraphicsApi::bind_vertex_layout
    fn configure_vertex_layout(
        &mut self,
        program: ResourceHandle,
        layout: &VertexLayout,
    ) -> Result<ResourceHandle>;
    fn create_texture(&mut self) -> Result<ResourceHandle>;
    fn upload_texture(
        &mut self,
        texture: ResourceHandle,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<()>;
    /// Frees a resource. Unknown handles are ignored.
    fn release(&mut self, kind: ResourceKind, handle: ResourceHandle);

    // Binding
    fn bind_vertex_buffer(&mut self, buffer: ResourceHandle) -> Result<()>;
    fn bind_index_buffer(&mut self, buffer: ResourceHandle) -> Result<()>;
    fn bind_vertex_layout(&mut self, layout: ResourceHandle) -> Result<()>;
    fn use_program(&mut self, program: Option<ResourceHandle>) -> Result<()>;
    fn bind_texture(&mut self, unit: u32, texture: ResourceHandle) -> Result<()>;
    fn unbind_vertex_buffer(&mut self);
    fn unbind_index_buffer(&mut self);

    // Uniforms. Names the program doesn't declare are ignored.
    fn set_uniform_i32(&mut self, program: ResourceHandle, name: &str, value: i32) -> Result<()>;
    fn set_uniform_vec4(
        &mut self,
        program: ResourceHandle,
        name: &str,
        value: [f32; 4],
    ) -> Result<()>;
    fn set_uniform_mat4(
        &mut self,
        program: ResourceHandle,
        name: &str,
        value: [[f32; 4]; 4],
    ) -> Result<()>;

    // Drawing
    fn draw_indexed_triangles(&mut self, index_count: u32) -> Result<()>;

    // Pipeline state
    fn set_viewport(&mut self, width: u32, height: u32);
    fn set_clear_color(&mut self, rgba: [f32; 4]);
    fn clear(&mut self);
    fn set_depth_test(&mut self, enabled: bool);
    fn set_blend(&mut self, enabled: bool);
    /// Submits everything recorded since the last [`clear`](GraphicsApi::clear).
    fn present(&mut self) -> Result<()>;
}
