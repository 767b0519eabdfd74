//! # Vertex Data Structures
//!
//! This module defines the CPU-side vertex representation and the layout
//! description that tells the GPU how interleaved vertex data is arranged.

use crate::gfx::resources::gpu_resource::{GpuResource, ResourceKind};

/// A single vertex. Only `position` is mandatory; which optional attributes
/// are present is dictated by the [`VertexLayout`] of the owning mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub texture_coord: Option<[f32; 2]>,
    pub color: Option<[f32; 4]>,
}

impl Vertex {
    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_normal(mut self, normal: [f32; 3]) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_texture_coord(mut self, uv: [f32; 2]) -> Self {
        self.texture_coord = Some(uv);
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns the raw components stored for `semantic`, if present.
    pub fn attribute(&self, semantic: VertexSemantic) -> Option<&[f32]> {
        match semantic {
            VertexSemantic::Position => Some(&self.position[..]),
            VertexSemantic::Normal => self.normal.as_ref().map(|n| &n[..]),
            VertexSemantic::TextureCoord => self.texture_coord.as_ref().map(|t| &t[..]),
            VertexSemantic::Color => self.color.as_ref().map(|c| &c[..]),
        }
    }
}

/// What a vertex attribute means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    Position,
    Normal,
    TextureCoord,
    Color,
}

impl VertexSemantic {
    pub const ALL: [VertexSemantic; 4] = [
        VertexSemantic::Position,
        VertexSemantic::Normal,
        VertexSemantic::TextureCoord,
        VertexSemantic::Color,
    ];

    /// Attribute name as it appears in shader source.
    pub fn name(&self) -> &'static str {
        match self {
            VertexSemantic::Position => "position",
            VertexSemantic::Normal => "normal",
            VertexSemantic::TextureCoord => "texCoord",
            VertexSemantic::Color => "color",
        }
    }

    pub fn components(&self) -> u32 {
        match self {
            VertexSemantic::Position | VertexSemantic::Normal => 3,
            VertexSemantic::TextureCoord => 2,
            VertexSemantic::Color => 4,
        }
    }
}

/// Scalar type of a vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Float32,
}

impl ScalarType {
    pub fn size(&self) -> u32 {
        match self {
            ScalarType::Float32 => 4,
        }
    }
}

/// One entry of a vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub semantic: VertexSemantic,
    pub components: u32,
    pub scalar: ScalarType,
    pub normalized: bool,
}

impl VertexAttribute {
    pub fn new(semantic: VertexSemantic, normalized: bool) -> Self {
        Self {
            semantic,
            components: semantic.components(),
            scalar: ScalarType::Float32,
            normalized,
        }
    }

    pub fn name(&self) -> &'static str {
        self.semantic.name()
    }

    pub fn byte_size(&self) -> u32 {
        self.components * self.scalar.size()
    }

    /// WGPU format for this attribute. Float attributes are uploaded as-is,
    /// so the normalization flag has no effect on them.
    pub fn wgpu_format(&self) -> wgpu::VertexFormat {
        match (self.scalar, self.components) {
            (ScalarType::Float32, 1) => wgpu::VertexFormat::Float32,
            (ScalarType::Float32, 2) => wgpu::VertexFormat::Float32x2,
            (ScalarType::Float32, 3) => wgpu::VertexFormat::Float32x3,
            (ScalarType::Float32, _) => wgpu::VertexFormat::Float32x4,
        }
    }
}

/// Ordered attribute list. Attribute order is the interleaving order in the
/// vertex buffer and attribute `i` is bound to shader location `i`.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    resource: GpuResource,
}

impl VertexLayout {
    pub fn new(attributes: Vec<VertexAttribute>) -> Self {
        Self {
            attributes,
            resource: GpuResource::new(ResourceKind::VertexLayout),
        }
    }

    /// Position and normal, the layout used by lit shapes.
    pub fn position_normal() -> Self {
        Self::new(vec![
            VertexAttribute::new(VertexSemantic::Position, false),
            VertexAttribute::new(VertexSemantic::Normal, true),
        ])
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn contains(&self, semantic: VertexSemantic) -> bool {
        self.attributes.iter().any(|a| a.semantic == semantic)
    }

    /// Size in bytes of one interleaved vertex.
    pub fn stride(&self) -> u32 {
        self.attributes.iter().map(|a| a.byte_size()).sum()
    }

    /// Number of floats per interleaved vertex.
    pub fn floats_per_vertex(&self) -> usize {
        self.attributes.iter().map(|a| a.components as usize).sum()
    }

    /// Returns the attribute descriptions for pipeline creation.
    ///
    /// Attribute `i` sits at shader location `i`, offset by the byte sizes of
    /// the attributes before it.
    pub fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        let mut offset = 0u64;
        self.attributes
            .iter()
            .enumerate()
            .map(|(location, attribute)| {
                let desc = wgpu::VertexAttribute {
                    format: attribute.wgpu_format(),
                    offset,
                    shader_location: location as u32,
                };
                offset += attribute.byte_size() as u64;
                desc
            })
            .collect()
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut GpuResource {
        &mut self.resource
    }
}

impl PartialEq for VertexLayout {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}
