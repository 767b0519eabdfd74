//! Mesh: vertices, triangles and the layout that describes them
//!
//! A mesh is immutable once built. Construction validates the vertices against
//! the layout and derives the interleaved vertex buffer and the flattened
//! index buffer that get uploaded.

use crate::errors::{RenderError, Result};
use crate::gfx::resources::buffer::{IndexBuffer, VertexBuffer};
use crate::gfx::scene::vertex::{Vertex, VertexLayout, VertexSemantic};

/// Validated geometry plus the buffers derived from it.
///
/// Only the renderer touches the GPU state of a built mesh:
///
/// ```compile_fail
/// use orrery::gfx::geometry::{BoxGeometry, ParameterizedGeometry};
///
/// let mut cube = BoxGeometry::new(1.0, 1.0, 1.0).calculate_mesh(0).unwrap();
/// let _ = cube.vertex_buffer_mut();
/// ```
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    triangles: Vec<[u32; 3]>,
    layout: VertexLayout,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
}

impl Mesh {
    /// Builds a mesh, failing if a vertex doesn't carry exactly the attributes
    /// the layout lists or a triangle references a missing vertex.
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<[u32; 3]>, layout: VertexLayout) -> Result<Self> {
        if !layout.contains(VertexSemantic::Position) {
            return Err(RenderError::VertexLayoutMismatch {
                vertex: 0,
                reason: "layout has no position attribute".to_string(),
            });
        }

        let mut interleaved = Vec::with_capacity(vertices.len() * layout.floats_per_vertex());
        for (i, vertex) in vertices.iter().enumerate() {
            for semantic in VertexSemantic::ALL {
                let declared = layout.contains(semantic);
                let present = vertex.attribute(semantic).is_some();
                if declared != present {
                    return Err(RenderError::VertexLayoutMismatch {
                        vertex: i,
                        reason: if declared {
                            format!("missing {} attribute", semantic.name())
                        } else {
                            format!("{} attribute not in layout", semantic.name())
                        },
                    });
                }
            }

            for attribute in layout.attributes() {
                if let Some(values) = vertex.attribute(attribute.semantic) {
                    interleaved.extend_from_slice(values);
                }
            }
        }

        let vertex_count = vertices.len();
        let mut indices = Vec::with_capacity(triangles.len() * 3);
        for &index in triangles.iter().flatten() {
            if index as usize >= vertex_count {
                return Err(RenderError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            indices.push(index);
        }

        Ok(Self {
            vertices,
            triangles,
            layout,
            vertex_buffer: VertexBuffer::new(interleaved),
            index_buffer: IndexBuffer::new(indices),
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub(crate) fn layout_mut(&mut self) -> &mut VertexLayout {
        &mut self.layout
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    pub(crate) fn vertex_buffer_mut(&mut self) -> &mut VertexBuffer {
        &mut self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.index_buffer
    }

    pub(crate) fn index_buffer_mut(&mut self) -> &mut IndexBuffer {
        &mut self.index_buffer
    }

    pub fn index_count(&self) -> u32 {
        self.index_buffer.len() as u32
    }

    pub fn reset_created(&mut self) {
        self.vertex_buffer.resource_mut().reset();
        self.index_buffer.resource_mut().reset();
        self.layout.resource_mut().reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::vertex::VertexAttribute;

    fn triangle() -> Vec<Vertex> {
        vec![
            Vertex::new([0.0, 0.0, 0.0]).with_normal([0.0, 0.0, 1.0]),
            Vertex::new([1.0, 0.0, 0.0]).with_normal([0.0, 0.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0]).with_normal([0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn test_interleaves_in_layout_order() {
        let mesh = Mesh::new(triangle(), vec![[0, 1, 2]], VertexLayout::position_normal()).unwrap();
        let data = mesh.vertex_buffer().data();
        assert_eq!(data.len(), 18);
        assert_eq!(&data[6..12], &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.index_buffer().indices(), &[0, 1, 2]);
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn test_missing_attribute_rejected() {
        let mut vertices = triangle();
        vertices[1].normal = None;
        let err = Mesh::new(vertices, vec![[0, 1, 2]], VertexLayout::position_normal()).unwrap_err();
        assert!(matches!(err, RenderError::VertexLayoutMismatch { vertex: 1, .. }));
    }

    #[test]
    fn test_extra_attribute_rejected() {
        let layout = VertexLayout::new(vec![VertexAttribute::new(VertexSemantic::Position, false)]);
        let err = Mesh::new(triangle(), vec![[0, 1, 2]], layout).unwrap_err();
        assert!(matches!(err, RenderError::VertexLayoutMismatch { vertex: 0, .. }));
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let err = Mesh::new(triangle(), vec![[0, 1, 3]], VertexLayout::position_normal()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        ));
    }
}
