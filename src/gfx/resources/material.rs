//! Material system
//!
//! A material is a named bag of typed properties bound to a shader program.
//! Property names are unique within a material, and a property keeps the kind
//! it was declared with.

use std::fmt;

use uuid::Uuid;

use crate::errors::{RenderError, Result};
use crate::gfx::resources::shader::ShaderProgram;
use crate::gfx::resources::texture::Texture;

/// Kind tag of a [`MaterialValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    Texture,
}

/// Typed property value.
#[derive(Debug, Clone)]
pub enum MaterialValue {
    Scalar(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([[f32; 4]; 4]),
    Texture(Texture),
}

impl MaterialValue {
    pub fn kind(&self) -> MaterialKind {
        match self {
            MaterialValue::Scalar(_) => MaterialKind::Scalar,
            MaterialValue::Vec2(_) => MaterialKind::Vec2,
            MaterialValue::Vec3(_) => MaterialKind::Vec3,
            MaterialValue::Vec4(_) => MaterialKind::Vec4,
            MaterialValue::Mat4(_) => MaterialKind::Mat4,
            MaterialValue::Texture(_) => MaterialKind::Texture,
        }
    }

    /// Zero-pads scalar and vector values to a vec4. `None` for matrices and
    /// textures.
    pub fn as_vec4(&self) -> Option<[f32; 4]> {
        match *self {
            MaterialValue::Scalar(s) => Some([s, 0.0, 0.0, 0.0]),
            MaterialValue::Vec2([x, y]) => Some([x, y, 0.0, 0.0]),
            MaterialValue::Vec3([x, y, z]) => Some([x, y, z, 0.0]),
            MaterialValue::Vec4(v) => Some(v),
            MaterialValue::Mat4(_) | MaterialValue::Texture(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialProperty {
    pub name: String,
    pub value: MaterialValue,
}

impl MaterialProperty {
    pub fn kind(&self) -> MaterialKind {
        self.value.kind()
    }
}

/// Material definition
///
/// Cloning a material gives it a fresh id and fresh GPU resources. The shader
/// source and texture pixels stay shared.
pub struct Material {
    id: Uuid,
    pub name: String,
    pub program: ShaderProgram,
    properties: Vec<MaterialProperty>,
}

impl Material {
    /// Creates a material with no properties.
    ///
    /// # Arguments
    /// * `name` - Display name, used in error messages
    /// * `program` - Shader program the properties are fed to
    pub fn new(name: &str, program: ShaderProgram) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            program,
            properties: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Declares a new property. Fails if the name is already taken, or if
    /// this is a second texture: programs sample a single texture unit.
    pub fn add_property(&mut self, name: &str, value: MaterialValue) -> Result<()> {
        if self.property(name).is_some() {
            return Err(RenderError::DuplicateMaterialProperty {
                material: self.name.clone(),
                property: name.to_string(),
            });
        }
        if value.kind() == MaterialKind::Texture && self.texture().is_some() {
            return Err(RenderError::TextureSlotTaken {
                material: self.name.clone(),
                property: name.to_string(),
            });
        }
        self.properties.push(MaterialProperty {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    /// Builder form of [`add_property`](Material::add_property).
    pub fn with_property(mut self, name: &str, value: MaterialValue) -> Result<Self> {
        self.add_property(name, value)?;
        Ok(self)
    }

    /// Replaces the value of an existing property. The new value must have the
    /// same kind as the declared one.
    pub fn set_property(&mut self, name: &str, value: MaterialValue) -> Result<()> {
        let material = &self.name;
        let property = self
            .properties
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| RenderError::UnknownMaterialProperty {
                material: material.clone(),
                property: name.to_string(),
            })?;

        if property.kind() != value.kind() {
            return Err(RenderError::PropertyKindMismatch {
                property: name.to_string(),
                expected: property.kind(),
                found: value.kind(),
            });
        }
        property.value = value;
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&MaterialValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Like [`property`](Material::property), but an unknown name is an error.
    pub fn require_property(&self, name: &str) -> Result<&MaterialValue> {
        self.property(name)
            .ok_or_else(|| RenderError::UnknownMaterialProperty {
                material: self.name.clone(),
                property: name.to_string(),
            })
    }

    /// The material's texture, if it has one.
    pub fn texture(&self) -> Option<&Texture> {
        self.properties.iter().find_map(|p| match &p.value {
            MaterialValue::Texture(texture) => Some(texture),
            _ => None,
        })
    }

    pub fn properties(&self) -> &[MaterialProperty] {
        &self.properties
    }

    pub(crate) fn properties_mut(&mut self) -> &mut [MaterialProperty] {
        &mut self.properties
    }

    /// Forces the program, its shaders and every texture to upload again.
    pub fn reset_created(&mut self) {
        self.program.reset_created();
        for property in &mut self.properties {
            if let MaterialValue::Texture(texture) = &mut property.value {
                texture.reset_created();
            }
        }
    }
}

impl Clone for Material {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            program: self.program.clone(),
            properties: self.properties.clone(),
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("properties", &self.properties.len())
            .finish()
    }
}
