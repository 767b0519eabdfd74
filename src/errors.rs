//! Error types
//!
//! Every fallible operation in the crate returns [`Result<T>`], an alias for
//! `std::result::Result<T, RenderError>`.
//!
//! Errors fall in two groups. *Global* failures (shader compilation, program
//! link, surface or device loss) abort the whole frame. Everything else raised
//! while preparing a single object only takes that object out of the frame.
//! See [`RenderError::is_global`].

use thiserror::Error;
use uuid::Uuid;

use crate::gfx::{
    rendering::backend::ResourceHandle,
    resources::{gpu_resource::ResourceKind, material::MaterialKind, shader::ShaderStage},
};

/// The main error type for the renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    // ========================================================================
    // Resource state
    // ========================================================================
    /// A resource was bound before the resource manager created it.
    #[error("Trying to bind {kind} that hasn't been created yet (object {owner:?})")]
    ResourceNotCreated {
        kind: ResourceKind,
        owner: Option<Uuid>,
    },

    /// The backend was handed a handle it never issued.
    #[error("Unknown {kind} handle {handle:?}")]
    UnknownHandle {
        kind: ResourceKind,
        handle: ResourceHandle,
    },

    /// A draw was submitted without the required binding.
    #[error("Draw submitted with no {kind} bound")]
    NothingBound { kind: ResourceKind },

    // ========================================================================
    // Materials
    // ========================================================================
    #[error("Property {property} on material {material} doesn't exist!")]
    UnknownMaterialProperty { material: String, property: String },

    #[error("Property {property} already exists on material {material}")]
    DuplicateMaterialProperty { material: String, property: String },

    #[error("Property {property} holds a {expected:?} value, got {found:?}")]
    PropertyKindMismatch {
        property: String,
        expected: MaterialKind,
        found: MaterialKind,
    },

    /// Materials sample at most one texture.
    #[error("Material {material} already has a texture, can't add {property}")]
    TextureSlotTaken { material: String, property: String },

    // ========================================================================
    // Geometry and payloads
    // ========================================================================
    #[error("Vertex {vertex} doesn't match the vertex layout: {reason}")]
    VertexLayoutMismatch { vertex: usize, reason: String },

    #[error("Triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Texture data has {found} bytes, expected {expected}")]
    InvalidTextureData { expected: usize, found: usize },

    // ========================================================================
    // GPU pipeline
    // ========================================================================
    #[error("Failed to compile {stage:?} shader: {message}")]
    ShaderCompilation { stage: ShaderStage, message: String },

    #[error("Failed to link shader program: {message}")]
    ProgramLink { message: String },

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequest(String),

    #[error("Failed to create WGPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    // ========================================================================
    // Windowing
    // ========================================================================
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

impl RenderError {
    /// Returns true when the failure can't be confined to a single object.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            RenderError::ShaderCompilation { .. }
                | RenderError::ProgramLink { .. }
                | RenderError::Surface(_)
                | RenderError::CreateSurface(_)
                | RenderError::AdapterRequest(_)
                | RenderError::DeviceRequest(_)
        )
    }

    /// Returns true when retrying next frame can't help and the app should
    /// stop.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RenderError::Surface(wgpu::SurfaceError::OutOfMemory)
                | RenderError::CreateSurface(_)
                | RenderError::AdapterRequest(_)
                | RenderError::DeviceRequest(_)
        )
    }
}

/// Alias for `std::result::Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;
