//! Shaders and shader programs
//!
//! A [`ShaderProgram`] pairs a vertex and a fragment [`Shader`] with the
//! [`UniformLayout`] both stages read. The layout is what lets a backend map
//! GL-style `set_uniform(name, value)` calls onto a packed uniform block.

use std::sync::Arc;

use crate::gfx::resources::gpu_resource::{GpuResource, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A single shader stage. Source text is shared between clones.
#[derive(Debug, Clone)]
pub struct Shader {
    stage: ShaderStage,
    source: Arc<str>,
    resource: GpuResource,
}

impl Shader {
    pub fn new(stage: ShaderStage, source: impl Into<Arc<str>>) -> Self {
        Self {
            stage,
            source: source.into(),
            resource: GpuResource::new(ResourceKind::Shader),
        }
    }

    pub fn vertex(source: impl Into<Arc<str>>) -> Self {
        Self::new(ShaderStage::Vertex, source)
    }

    pub fn fragment(source: impl Into<Arc<str>>) -> Self {
        Self::new(ShaderStage::Fragment, source)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut GpuResource {
        &mut self.resource
    }
}

/// Type of a declared uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Int,
    Vec4,
    Mat4,
    /// Sampled 2D texture. Lives outside the uniform block.
    Texture,
}

impl UniformKind {
    /// Bytes taken in the uniform block (std140 rules, every slot 16-aligned).
    pub fn block_size(&self) -> usize {
        match self {
            UniformKind::Int | UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
            UniformKind::Texture => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: String,
    pub kind: UniformKind,
}

/// Ordered uniform declarations of a program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformLayout {
    uniforms: Vec<UniformDecl>,
}

impl UniformLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, kind: UniformKind) -> Self {
        self.uniforms.push(UniformDecl {
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn uniforms(&self) -> &[UniformDecl] {
        &self.uniforms
    }

    pub fn get(&self, name: &str) -> Option<&UniformDecl> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    /// Byte offset of `name` inside the uniform block, with its kind.
    pub fn offset_of(&self, name: &str) -> Option<(usize, UniformKind)> {
        let mut offset = 0;
        for uniform in &self.uniforms {
            if uniform.name == name {
                return Some((offset, uniform.kind));
            }
            offset += uniform.kind.block_size();
        }
        None
    }

    /// Total size of the uniform block.
    pub fn block_size(&self) -> usize {
        self.uniforms.iter().map(|u| u.kind.block_size()).sum()
    }

    pub fn has_texture(&self) -> bool {
        self.uniforms.iter().any(|u| u.kind == UniformKind::Texture)
    }
}

/// Linked vertex + fragment program.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    pub vertex: Shader,
    pub fragment: Shader,
    uniforms: UniformLayout,
    resource: GpuResource,
}

impl ShaderProgram {
    pub fn new(vertex: Shader, fragment: Shader, uniforms: UniformLayout) -> Self {
        Self {
            vertex,
            fragment,
            uniforms,
            resource: GpuResource::new(ResourceKind::ShaderProgram),
        }
    }

    /// Builds a program from a single WGSL module holding both `vs_main` and
    /// `fs_main` entry points.
    pub fn from_wgsl(source: &str, uniforms: UniformLayout) -> Self {
        let source: Arc<str> = Arc::from(source);
        Self::new(
            Shader::vertex(source.clone()),
            Shader::fragment(source),
            uniforms,
        )
    }

    pub fn uniforms(&self) -> &UniformLayout {
        &self.uniforms
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut GpuResource {
        &mut self.resource
    }

    /// Resets the program and both of its stages.
    pub fn reset_created(&mut self) {
        self.vertex.resource_mut().reset();
        self.fragment.resource_mut().reset();
        self.resource.reset();
    }
}
