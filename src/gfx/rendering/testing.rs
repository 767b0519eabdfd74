//! In-memory [`GraphicsApi`] used by the renderer tests.

use std::collections::HashSet;

use crate::errors::{RenderError, Result};
use crate::gfx::rendering::backend::{GraphicsApi, ResourceHandle};
use crate::gfx::resources::gpu_resource::ResourceKind;
use crate::gfx::resources::shader::{ShaderStage, UniformLayout};
use crate::gfx::scene::vertex::VertexLayout;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateVertexBuffer,
    CreateIndexBuffer,
    CreateShader(ShaderStage),
    CreateProgram,
    ConfigureVertexLayout,
    CreateTexture,
    UploadTexture(ResourceHandle),
    Release(ResourceKind, ResourceHandle),
    BindVertexBuffer(ResourceHandle),
    BindIndexBuffer(ResourceHandle),
    BindVertexLayout(ResourceHandle),
    UseProgram(Option<ResourceHandle>),
    BindTexture(u32, ResourceHandle),
    UnbindVertexBuffer,
    UnbindIndexBuffer,
    SetUniform(String),
    Draw(u32),
    Clear,
    Present,
}

impl Call {
    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            Call::CreateVertexBuffer
                | Call::CreateIndexBuffer
                | Call::CreateShader(_)
                | Call::CreateProgram
                | Call::ConfigureVertexLayout
                | Call::CreateTexture
                | Call::UploadTexture(_)
        )
    }
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    /// Makes every shader of this stage fail to compile.
    pub fail_shader: Option<ShaderStage>,
    /// Makes vertex buffer creation fail with a per-object error.
    pub fail_vertex_buffers: bool,
    /// Makes `present` fail as if the surface ran out of memory.
    pub fail_present: bool,
    next_handle: u64,
    issued: HashSet<ResourceHandle>,
    vertex_buffer: Option<ResourceHandle>,
    index_buffer: Option<ResourceHandle>,
    program: Option<ResourceHandle>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, call: Call) -> ResourceHandle {
        self.next_handle += 1;
        let handle = ResourceHandle(self.next_handle);
        self.issued.insert(handle);
        self.calls.push(call);
        handle
    }

    fn check(&self, kind: ResourceKind, handle: ResourceHandle) -> Result<()> {
        if self.issued.contains(&handle) {
            Ok(())
        } else {
            Err(RenderError::UnknownHandle { kind, handle })
        }
    }

    pub fn creation_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_creation()).count()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn releases(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Release(..)))
            .count()
    }

    pub fn draws(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(n) => Some(*n),
                _ => None,
            })
            .collect()
    }
}

impl GraphicsApi for RecordingBackend {
    fn create_vertex_buffer(&mut self, _data: &[u8]) -> Result<ResourceHandle> {
        if self.fail_vertex_buffers {
            return Err(RenderError::VertexLayoutMismatch {
                vertex: 0,
                reason: "injected failure".to_string(),
            });
        }
        Ok(self.issue(Call::CreateVertexBuffer))
    }

    fn create_index_buffer(&mut self, _data: &[u8]) -> Result<ResourceHandle> {
        Ok(self.issue(Call::CreateIndexBuffer))
    }

    fn create_shader(&mut self, stage: ShaderStage, _source: &str) -> Result<ResourceHandle> {
        if self.fail_shader == Some(stage) {
            return Err(RenderError::ShaderCompilation {
                stage,
                message: "injected failure".to_string(),
            });
        }
        Ok(self.issue(Call::CreateShader(stage)))
    }

    fn create_program(
        &mut self,
        vertex: ResourceHandle,
        fragment: ResourceHandle,
        _uniforms: &UniformLayout,
    ) -> Result<ResourceHandle> {
        self.check(ResourceKind::Shader, vertex)?;
        self.check(ResourceKind::Shader, fragment)?;
        Ok(self.issue(Call::CreateProgram))
    }

    fn configure_vertex_layout(
        &mut self,
        program: ResourceHandle,
        _layout: &VertexLayout,
    ) -> Result<ResourceHandle> {
        self.check(ResourceKind::ShaderProgram, program)?;
        Ok(self.issue(Call::ConfigureVertexLayout))
    }

    fn create_texture(&mut self) -> Result<ResourceHandle> {
        Ok(self.issue(Call::CreateTexture))
    }

    fn upload_texture(
        &mut self,
        texture: ResourceHandle,
        _width: u32,
        _height: u32,
        _rgba: &[u8],
    ) -> Result<()> {
        self.check(ResourceKind::Texture, texture)?;
        self.calls.push(Call::UploadTexture(texture));
        Ok(())
    }

    fn release(&mut self, kind: ResourceKind, handle: ResourceHandle) {
        self.issued.remove(&handle);
        self.calls.push(Call::Release(kind, handle));
    }

    fn bind_vertex_buffer(&mut self, buffer: ResourceHandle) -> Result<()> {
        self.check(ResourceKind::VertexBuffer, buffer)?;
        self.vertex_buffer = Some(buffer);
        self.calls.push(Call::BindVertexBuffer(buffer));
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: ResourceHandle) -> Result<()> {
        self.check(ResourceKind::IndexBuffer, buffer)?;
        self.index_buffer = Some(buffer);
        self.calls.push(Call::BindIndexBuffer(buffer));
        Ok(())
    }

    fn bind_vertex_layout(&mut self, layout: ResourceHandle) -> Result<()> {
        self.check(ResourceKind::VertexLayout, layout)?;
        self.calls.push(Call::BindVertexLayout(layout));
        Ok(())
    }

    fn use_program(&mut self, program: Option<ResourceHandle>) -> Result<()> {
        if let Some(handle) = program {
            self.check(ResourceKind::ShaderProgram, handle)?;
        }
        self.program = program;
        self.calls.push(Call::UseProgram(program));
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: ResourceHandle) -> Result<()> {
        self.check(ResourceKind::Texture, texture)?;
        self.calls.push(Call::BindTexture(unit, texture));
        Ok(())
    }

    fn unbind_vertex_buffer(&mut self) {
        self.vertex_buffer = None;
        self.calls.push(Call::UnbindVertexBuffer);
    }

    fn unbind_index_buffer(&mut self) {
        self.index_buffer = None;
        self.calls.push(Call::UnbindIndexBuffer);
    }

    fn set_uniform_i32(&mut self, program: ResourceHandle, name: &str, _value: i32) -> Result<()> {
        self.check(ResourceKind::ShaderProgram, program)?;
        self.calls.push(Call::SetUniform(name.to_string()));
        Ok(())
    }

    fn set_uniform_vec4(
        &mut self,
        program: ResourceHandle,
        name: &str,
        _value: [f32; 4],
    ) -> Result<()> {
        self.check(ResourceKind::ShaderProgram, program)?;
        self.calls.push(Call::SetUniform(name.to_string()));
        Ok(())
    }

    fn set_uniform_mat4(
        &mut self,
        program: ResourceHandle,
        name: &str,
        _value: [[f32; 4]; 4],
    ) -> Result<()> {
        self.check(ResourceKind::ShaderProgram, program)?;
        self.calls.push(Call::SetUniform(name.to_string()));
        Ok(())
    }

    fn draw_indexed_triangles(&mut self, index_count: u32) -> Result<()> {
        if self.vertex_buffer.is_none() {
            return Err(RenderError::NothingBound {
                kind: ResourceKind::VertexBuffer,
            });
        }
        if self.index_buffer.is_none() {
            return Err(RenderError::NothingBound {
                kind: ResourceKind::IndexBuffer,
            });
        }
        if self.program.is_none() {
            return Err(RenderError::NothingBound {
                kind: ResourceKind::ShaderProgram,
            });
        }
        self.calls.push(Call::Draw(index_count));
        Ok(())
    }

    fn set_viewport(&mut self, _width: u32, _height: u32) {}

    fn set_clear_color(&mut self, _rgba: [f32; 4]) {}

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn set_depth_test(&mut self, _enabled: bool) {}

    fn set_blend(&mut self, _enabled: bool) {}

    fn present(&mut self) -> Result<()> {
        self.calls.push(Call::Present);
        if self.fail_present {
            return Err(wgpu::SurfaceError::OutOfMemory.into());
        }
        Ok(())
    }
}
