use cgmath::{InnerSpace, Vector2, Vector3};

use super::{Controller, PointerEvent};
use crate::gfx::camera::WORLD_UP;
use crate::gfx::scene::Scene;
use crate::math::{to_cartesian, to_spherical};

const ORIGIN: Vector3<f32> = Vector3::new(0.0, 0.0, 0.0);

#[derive(Debug, Clone, Copy)]
struct DragState {
    anchor: Vector2<f32>,
    camera_start: Vector3<f32>,
}

/// Drags the camera over a sphere around the origin, always looking at it.
/// The wheel moves the camera closer to or further from the origin.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub sensitivity: f32,
    drag: Option<DragState>,
}

impl OrbitController {
    pub const DEFAULT_SENSITIVITY: f32 = 1.3;
    pub const ZOOM_STEP: f32 = 0.075;
    pub const MIN_RADIUS: f32 = 0.001;

    pub fn new() -> Self {
        Self::with_sensitivity(Self::DEFAULT_SENSITIVITY)
    }

    pub fn with_sensitivity(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for OrbitController {
    fn name(&self) -> &str {
        "Orbit"
    }

    fn on_mouse_down(&mut self, scene: &mut Scene, event: &PointerEvent) {
        self.drag = Some(DragState {
            anchor: event.normalized(),
            camera_start: scene.camera().translation,
        });
    }

    fn on_mouse_move(&mut self, scene: &mut Scene, event: &PointerEvent) {
        let Some(drag) = self.drag else {
            return;
        };

        let camera = scene.camera_mut();
        let dir = (ORIGIN - camera.translation).normalize();
        let right = WORLD_UP.cross(dir).normalize();
        let up = dir.cross(right).normalize();

        let delta = event.normalized() - drag.anchor;
        let candidate = drag.camera_start
            + right * (delta.x * self.sensitivity)
            + up * (delta.y * -self.sensitivity);

        // Stay on the sphere the drag started on.
        let mut spherical = to_spherical(candidate);
        spherical.radius = drag.camera_start.magnitude();

        camera.translation = to_cartesian(spherical);
        camera.look_at(ORIGIN);
    }

    fn on_mouse_up(&mut self, _scene: &mut Scene, _event: &PointerEvent) {
        self.drag = None;
    }

    fn on_wheel(&mut self, scene: &mut Scene, event: &PointerEvent) {
        let camera = scene.camera_mut();
        let mut spherical = to_spherical(camera.translation);

        let direction = if event.delta_y < 0.0 { -1.0 } else { 1.0 };
        spherical.radius = (spherical.radius + direction * Self::ZOOM_STEP).max(Self::MIN_RADIUS);

        camera.translation = to_cartesian(spherical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Camera;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn scene_at(position: Vector3<f32>) -> Scene {
        Scene::new(Camera::new(W / H).with_translation(position))
    }

    #[test]
    fn test_drag_keeps_radius() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = scene_at(Vector3::new(0.3, 0.4, 2.0));
        let radius = scene.camera().translation.magnitude();

        let mut controller = OrbitController::new();
        controller.on_mouse_down(&mut scene, &PointerEvent::new(400.0, 300.0, W, H));

        for _ in 0..100 {
            let event = PointerEvent::new(
                rng.random_range(0.0..W),
                rng.random_range(0.0..H),
                W,
                H,
            );
            controller.on_mouse_move(&mut scene, &event);
            let distance = scene.camera().translation.magnitude();
            assert!((distance - radius).abs() < 1e-4, "{} != {}", distance, radius);
        }
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let mut scene = scene_at(Vector3::new(0.0, 0.0, 2.0));
        let mut controller = OrbitController::new();
        controller.on_mouse_move(&mut scene, &PointerEvent::new(10.0, 10.0, W, H));
        assert_eq!(scene.camera().translation, Vector3::new(0.0, 0.0, 2.0));

        controller.on_mouse_down(&mut scene, &PointerEvent::new(400.0, 300.0, W, H));
        controller.on_mouse_up(&mut scene, &PointerEvent::new(400.0, 300.0, W, H));
        assert!(!controller.is_dragging());
        controller.on_mouse_move(&mut scene, &PointerEvent::new(10.0, 10.0, W, H));
        assert_eq!(scene.camera().translation, Vector3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_drag_right_orbits_and_looks_at_origin() {
        let mut scene = scene_at(Vector3::new(0.0, 0.0, 2.0));
        let mut controller = OrbitController::new();
        controller.on_mouse_down(&mut scene, &PointerEvent::new(400.0, 300.0, W, H));
        controller.on_mouse_move(&mut scene, &PointerEvent::new(500.0, 300.0, W, H));

        let camera = scene.camera();
        // Dragging right swings the camera towards -x.
        assert!(camera.translation.x < 0.0);
        assert!(camera.translation.y.abs() < 1e-5);

        let origin = (camera.view_matrix() * Vector3::new(0.0, 0.0, 0.0).extend(1.0)).truncate();
        assert!((origin - Vector3::new(0.0, 0.0, -2.0)).magnitude() < 1e-3);
    }

    #[test]
    fn test_wheel_steps_and_clamps() {
        let mut scene = scene_at(Vector3::new(0.0, 0.0, 2.0));
        let mut controller = OrbitController::new();
        let event = PointerEvent::new(0.0, 0.0, W, H);

        controller.on_wheel(&mut scene, &event.with_delta_y(3.0));
        assert!((scene.camera().translation.z - 2.075).abs() < 1e-5);

        controller.on_wheel(&mut scene, &event.with_delta_y(-1.0));
        controller.on_wheel(&mut scene, &event.with_delta_y(-120.0));
        assert!((scene.camera().translation.z - 1.925).abs() < 1e-5);

        for _ in 0..100 {
            controller.on_wheel(&mut scene, &event.with_delta_y(-1.0));
        }
        let radius = scene.camera().translation.magnitude();
        assert!((radius - OrbitController::MIN_RADIUS).abs() < 1e-6);
    }
}
