use std::fmt;
use std::rc::Rc;

use cgmath::{perspective, Deg, InnerSpace, Matrix3, Matrix4, Vector3};

use super::camera_utils::quaternion_from_euler_deg;
use crate::math::rotation_matrix_to_euler_angles;

pub const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Per-frame camera hook, called with the scene time.
pub type CameraHook = Rc<dyn Fn(f32, &mut Camera)>;

/// Orthonormal basis produced by [`Camera::look_at`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAtBasis {
    /// Unit vector from the target towards the camera.
    pub dir: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
}

/// Perspective camera positioned by a translation and Euler rotation.
///
/// View and projection matrices are derived on every call, so changes to the
/// fields show up on the next frame without any invalidation step.
pub struct Camera {
    pub aspect_ratio: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub translation: Vector3<f32>,
    /// Euler angles in degrees, ZYX order.
    pub rotation: Vector3<f32>,
    update_hook: Option<CameraHook>,
}

impl Camera {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            aspect_ratio,
            fov_y: 45.0,
            near: 0.01,
            far: 1000.0,
            translation: Vector3::new(0.0, 0.0, 2.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            update_hook: None,
        }
    }

    pub fn with_perspective(mut self, fov_y: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_y;
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.translation = translation;
        self
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// OpenGL-style projection (clip z in `[-w, w]`). The shaders remap depth
    /// into wgpu's `[0, w]` range.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(Deg(self.fov_y), self.aspect_ratio, self.near, self.far)
    }

    /// World transform of the camera, `T(translation) * R(rotation)`.
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(quaternion_from_euler_deg(self.rotation))
    }

    /// Inverse of [`transform`](Camera::transform).
    pub fn view_matrix(&self) -> Matrix4<f32> {
        // Rigid transform: invert as R^T * T(-t).
        let rotation = quaternion_from_euler_deg(self.rotation);
        Matrix4::from(rotation.conjugate()) * Matrix4::from_translation(-self.translation)
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation += Vector3::new(dx, dy, dz);
    }

    /// Points the camera at `target` and returns the basis it used.
    ///
    /// The basis `[right | up | dir]` is converted to ZYX Euler angles, then
    /// mapped to the camera rotation as `(-x + 180°, y + 180°, z)`. The offsets
    /// account for `up` being built as `dir x right`, which points down.
    ///
    /// `target` must differ from the camera position and must not lie straight
    /// above or below it. Within a degree of the z = 0 plane through the target
    /// the extraction snaps to its gimbal-lock solution, so the aim is only
    /// approximate there.
    pub fn look_at(&mut self, target: Vector3<f32>) -> LookAtBasis {
        let dir = (self.translation - target).normalize();
        let right = dir.cross(WORLD_UP).normalize();
        let up = dir.cross(right).normalize();

        let angles = rotation_matrix_to_euler_angles(&Matrix3::from_cols(right, up, dir));
        self.rotation = Vector3::new(
            -angles.x.to_degrees() + 180.0,
            angles.y.to_degrees() + 180.0,
            angles.z.to_degrees(),
        );

        LookAtBasis { dir, right, up }
    }

    pub fn set_update_hook<F>(&mut self, hook: F)
    where
        F: Fn(f32, &mut Camera) + 'static,
    {
        self.update_hook = Some(Rc::new(hook));
    }

    pub fn clear_update_hook(&mut self) {
        self.update_hook = None;
    }

    pub fn update_hook(&self) -> Option<CameraHook> {
        self.update_hook.clone()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("aspect_ratio", &self.aspect_ratio)
            .field("fov_y", &self.fov_y)
            .field("near", &self.near)
            .field("far", &self.far)
            .field("translation", &self.translation)
            .field("rotation", &self.rotation)
            .field("has_update_hook", &self.update_hook.is_some())
            .finish()
    }
}
