//! Lazy GPU resource state
//!
//! Every CPU-side object that mirrors something on the GPU (buffers, shaders,
//! programs, vertex layouts, textures) carries a [`GpuResource`]. It starts out
//! [`ResourceState::Uninitialized`] and moves to [`ResourceState::Created`]
//! exactly once, when the renderer hands it a backend handle. The handle only
//! exists inside the `Created` variant, so a resource can never claim a handle
//! it doesn't have.
//!
//! Cloning a resource always yields an uninitialized one: a clone is a distinct
//! GPU object even when the payload it describes is shared.

use std::fmt;

use uuid::Uuid;

use crate::errors::{RenderError, Result};
use crate::gfx::rendering::backend::ResourceHandle;

/// The kinds of GPU-side objects the renderer manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    VertexBuffer,
    IndexBuffer,
    VertexLayout,
    Shader,
    ShaderProgram,
    Texture,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::VertexBuffer => "vertex buffer",
            ResourceKind::IndexBuffer => "index buffer",
            ResourceKind::VertexLayout => "vertex layout",
            ResourceKind::Shader => "shader",
            ResourceKind::ShaderProgram => "shader program",
            ResourceKind::Texture => "texture",
        };
        f.write_str(name)
    }
}

/// Upload state of a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Uninitialized,
    Created(ResourceHandle),
}

/// State wrapper embedded in every GPU-backed object.
#[derive(Debug, PartialEq, Eq)]
pub struct GpuResource {
    kind: ResourceKind,
    state: ResourceState,
}

impl GpuResource {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            state: ResourceState::Uninitialized,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn is_created(&self) -> bool {
        matches!(self.state, ResourceState::Created(_))
    }

    pub fn handle(&self) -> Option<ResourceHandle> {
        match self.state {
            ResourceState::Created(handle) => Some(handle),
            ResourceState::Uninitialized => None,
        }
    }

    /// Returns the handle, or a [`RenderError::ResourceNotCreated`] naming the
    /// resource kind and the object that owns it.
    pub fn require(&self, owner: Option<Uuid>) -> Result<ResourceHandle> {
        self.handle().ok_or(RenderError::ResourceNotCreated {
            kind: self.kind,
            owner,
        })
    }

    /// Records the backend handle. Only the renderer calls this, and only on
    /// an uninitialized resource.
    pub(crate) fn mark_created(&mut self, handle: ResourceHandle) {
        debug_assert!(
            !self.is_created(),
            "{} created twice without a reset",
            self.kind
        );
        self.state = ResourceState::Created(handle);
    }

    /// Forgets the handle so the next preprocessing pass uploads again.
    pub fn reset(&mut self) {
        self.state = ResourceState::Uninitialized;
    }
}

impl Clone for GpuResource {
    fn clone(&self) -> Self {
        Self::new(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uninitialized() {
        let resource = GpuResource::new(ResourceKind::Shader);
        assert!(!resource.is_created());
        assert_eq!(resource.handle(), None);
        assert_eq!(resource.state(), ResourceState::Uninitialized);
    }

    #[test]
    fn test_require_reports_kind_and_owner() {
        let owner = Uuid::new_v4();
        let resource = GpuResource::new(ResourceKind::IndexBuffer);
        match resource.require(Some(owner)) {
            Err(RenderError::ResourceNotCreated { kind, owner: o }) => {
                assert_eq!(kind, ResourceKind::IndexBuffer);
                assert_eq!(o, Some(owner));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_clone_resets_state() {
        let mut resource = GpuResource::new(ResourceKind::Texture);
        resource.mark_created(ResourceHandle(4));
        assert_eq!(resource.require(None).unwrap(), ResourceHandle(4));

        let clone = resource.clone();
        assert!(!clone.is_created());
        assert_eq!(clone.kind(), ResourceKind::Texture);
        assert!(resource.is_created());
    }

    #[test]
    fn test_reset_allows_recreation() {
        let mut resource = GpuResource::new(ResourceKind::VertexBuffer);
        resource.mark_created(ResourceHandle(1));
        resource.reset();
        assert!(!resource.is_created());
        resource.mark_created(ResourceHandle(2));
        assert_eq!(resource.handle(), Some(ResourceHandle(2)));
    }
}
