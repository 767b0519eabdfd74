//! Vertex and index buffers
//!
//! Both buffers share their payload through an `Arc` so mesh clones don't copy
//! geometry, while each clone gets its own [`GpuResource`].

use std::sync::Arc;

use crate::gfx::resources::gpu_resource::{GpuResource, ResourceKind};

/// Interleaved vertex data ready for upload.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    data: Arc<[f32]>,
    resource: GpuResource,
}

impl VertexBuffer {
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data: data.into(),
            resource: GpuResource::new(ResourceKind::VertexBuffer),
        }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut GpuResource {
        &mut self.resource
    }

    pub(crate) fn shares_payload_with(&self, other: &VertexBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// Flattened `u32` triangle indices.
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    indices: Arc<[u32]>,
    resource: GpuResource,
}

impl IndexBuffer {
    pub fn new(indices: Vec<u32>) -> Self {
        Self {
            indices: indices.into(),
            resource: GpuResource::new(ResourceKind::IndexBuffer),
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut GpuResource {
        &mut self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::backend::ResourceHandle;

    #[test]
    fn test_bytes_view_payload() {
        let buffer = IndexBuffer::new(vec![1, 2, 3]);
        assert_eq!(buffer.bytes().len(), 12);
        assert_eq!(&buffer.bytes()[..4], &1u32.to_ne_bytes());
    }

    #[test]
    fn test_clone_shares_payload_not_state() {
        let mut buffer = VertexBuffer::new(vec![0.0, 1.0, 2.0]);
        buffer.resource_mut().mark_created(ResourceHandle(9));

        let clone = buffer.clone();
        assert!(clone.shares_payload_with(&buffer));
        assert!(!clone.resource().is_created());
        assert!(buffer.resource().is_created());
    }
}
