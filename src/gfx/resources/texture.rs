//! CPU-side texture payload
//!
//! Pixel data is RGBA8. Creation and upload are separate steps: the renderer
//! first creates the texture object, then uploads pixels once and sets
//! `loaded`.

use std::sync::Arc;

use crate::errors::{RenderError, Result};
use crate::gfx::resources::gpu_resource::{GpuResource, ResourceKind};

#[derive(Debug)]
pub struct Texture {
    pub name: String,
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
    resource: GpuResource,
    loaded: bool,
}

impl Texture {
    pub fn from_rgba(name: &str, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::InvalidTextureData {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            width,
            height,
            pixels: pixels.into(),
            resource: GpuResource::new(ResourceKind::Texture),
            loaded: false,
        })
    }

    /// A 1x1 texture of a single color.
    pub fn solid(name: &str, rgba: [u8; 4]) -> Self {
        Self {
            name: name.to_string(),
            width: 1,
            height: 1,
            pixels: Arc::from(&rgba[..]),
            resource: GpuResource::new(ResourceKind::Texture),
            loaded: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut GpuResource {
        &mut self.resource
    }

    pub fn reset_created(&mut self) {
        self.resource.reset();
        self.loaded = false;
    }
}

// Manual impl so clones start unloaded along with their reset resource.
impl Clone for Texture {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
            resource: self.resource.clone(),
            loaded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_pixel_count() {
        match Texture::from_rgba("bad", 2, 2, vec![0; 15]) {
            Err(RenderError::InvalidTextureData { expected, found }) => {
                assert_eq!(expected, 16);
                assert_eq!(found, 15);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_clone_is_unloaded() {
        let mut texture = Texture::solid("white", [255; 4]);
        texture.mark_loaded();
        let clone = texture.clone();
        assert!(!clone.is_loaded());
        assert_eq!(clone.pixels(), texture.pixels());

        texture.reset_created();
        assert!(!texture.is_loaded());
    }
}
