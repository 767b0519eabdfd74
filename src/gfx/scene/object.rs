use std::fmt;
use std::rc::Rc;

use cgmath::{Matrix4, Vector3};
use uuid::Uuid;

use crate::gfx::camera::compose_transform;
use crate::gfx::resources::material::Material;
use crate::gfx::scene::mesh::Mesh;

/// Per-frame object hook, called with the scene time.
pub type ObjectHook = Rc<dyn Fn(f32, &mut SceneObject)>;

/// A positioned, scaled and rotated instance of a mesh with a material.
pub struct SceneObject {
    id: Uuid,
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// Euler angles in degrees, ZYX order.
    pub rotation: Vector3<f32>,
    update_hook: Option<ObjectHook>,
}

impl SceneObject {
    /// Create a new object with identity transformation
    pub fn new(name: &str, mesh: Mesh, material: Material) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            mesh,
            material,
            translation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            update_hook: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Model transform `T * R * S`, rebuilt from the current fields.
    pub fn transform(&self) -> Matrix4<f32> {
        compose_transform(self.translation, self.rotation, self.scale)
    }

    /// Set translation
    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.translation = Vector3::new(x, y, z);
    }

    /// Add to the current translation
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.translation += Vector3::new(dx, dy, dz);
    }

    /// Set uniform scale
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    /// Set non-uniform scale
    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Vector3::new(x, y, z);
    }

    /// Set rotation in degrees
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vector3::new(x, y, z);
    }

    /// Add to the current rotation, in degrees
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation += Vector3::new(dx, dy, dz);
    }

    pub fn set_update_hook<F>(&mut self, hook: F)
    where
        F: Fn(f32, &mut SceneObject) + 'static,
    {
        self.update_hook = Some(Rc::new(hook));
    }

    pub fn update_hook(&self) -> Option<ObjectHook> {
        self.update_hook.clone()
    }

    /// Forces every GPU resource of the mesh and material to upload again.
    pub fn reset_created(&mut self) {
        self.mesh.reset_created();
        self.material.reset_created();
    }
}

/// Deep copy with a fresh id and fresh GPU resources. Mesh payload and
/// shader source stay shared; the update hook is shared.
impl Clone for SceneObject {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            mesh: self.mesh.clone(),
            material: self.material.clone(),
            translation: self.translation,
            scale: self.scale,
            rotation: self.rotation,
            update_hook: self.update_hook.clone(),
        }
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("material", &self.material)
            .field("translation", &self.translation)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .finish()
    }
}
