use cgmath::{InnerSpace, Vector2, Vector3};
use uuid::Uuid;

use super::{Controller, PointerEvent};
use crate::gfx::scene::{Scene, SceneObject};

/// Adds copies of a template object to the scene.
///
/// Pressing adds a small copy that grows with the drag distance until the
/// button is released. A click also drops a fixed-size copy at the origin.
#[derive(Debug, Clone)]
pub struct AddShapeController {
    template: SceneObject,
    pub sensitivity: f32,
    anchor: Option<Vector2<f32>>,
    camera_start: Option<Vector3<f32>>,
    in_progress: Option<Uuid>,
}

impl AddShapeController {
    pub const DRAG_START_SCALE: f32 = 0.1;
    pub const CLICK_SCALE: f32 = 0.05;
    pub const DEFAULT_SENSITIVITY: f32 = 0.5;

    pub fn new(template: SceneObject) -> Self {
        Self {
            template,
            sensitivity: Self::DEFAULT_SENSITIVITY,
            anchor: None,
            camera_start: None,
            in_progress: None,
        }
    }

    /// Id of the shape being sized by the current drag.
    pub fn in_progress(&self) -> Option<Uuid> {
        self.in_progress
    }

    pub fn camera_at_drag_start(&self) -> Option<Vector3<f32>> {
        self.camera_start
    }
}

impl Controller for AddShapeController {
    fn name(&self) -> &str {
        "Add Shape"
    }

    fn on_mouse_down(&mut self, scene: &mut Scene, event: &PointerEvent) {
        self.anchor = Some(event.normalized());
        self.camera_start = Some(scene.camera().translation);

        if self.in_progress.is_none() {
            let mut shape = self.template.clone();
            shape.set_uniform_scale(Self::DRAG_START_SCALE);
            self.in_progress = Some(scene.add_object(shape));
        }
    }

    fn on_mouse_move(&mut self, scene: &mut Scene, event: &PointerEvent) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let size = (event.normalized() - anchor).magnitude();

        if let Some(shape) = self.in_progress.and_then(|id| scene.object_mut(id)) {
            shape.set_uniform_scale(size);
        }
    }

    fn on_click(&mut self, scene: &mut Scene, _event: &PointerEvent) {
        let mut shape = self.template.clone();
        shape.set_translation(0.0, 0.0, 0.0);
        shape.set_uniform_scale(Self::CLICK_SCALE);
        scene.add_object(shape);
    }

    fn on_mouse_up(&mut self, _scene: &mut Scene, _event: &PointerEvent) {
        self.anchor = None;
        self.camera_start = None;
        self.in_progress = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Camera;
    use crate::gfx::shapes;

    const W: f32 = 100.0;
    const H: f32 = 100.0;

    fn controller() -> AddShapeController {
        AddShapeController::new(shapes::cube().unwrap())
    }

    #[test]
    fn test_press_adds_small_shape_once() {
        let mut scene = Scene::new(Camera::default());
        let mut controller = controller();

        controller.on_mouse_down(&mut scene, &PointerEvent::new(50.0, 50.0, W, H));
        assert_eq!(scene.objects().len(), 1);
        let id = controller.in_progress().unwrap();
        assert_eq!(
            scene.object(id).unwrap().scale,
            Vector3::new(0.1, 0.1, 0.1)
        );
        assert_eq!(controller.camera_at_drag_start(), Some(Vector3::new(0.0, 0.0, 2.0)));

        // A second press during the same drag reuses the shape.
        controller.on_mouse_down(&mut scene, &PointerEvent::new(50.0, 50.0, W, H));
        assert_eq!(scene.objects().len(), 1);
    }

    #[test]
    fn test_drag_scales_by_pointer_distance() {
        let mut scene = Scene::new(Camera::default());
        let mut controller = controller();

        controller.on_mouse_down(&mut scene, &PointerEvent::new(50.0, 50.0, W, H));
        // (80, 10) normalizes to (0.6, 0.8): distance 1 from the center.
        controller.on_mouse_move(&mut scene, &PointerEvent::new(80.0, 10.0, W, H));

        let id = controller.in_progress().unwrap();
        let scale = scene.object(id).unwrap().scale;
        for component in [scale.x, scale.y, scale.z] {
            assert!((component - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_release_keeps_shape_and_clears_state() {
        let mut scene = Scene::new(Camera::default());
        let mut controller = controller();
        let event = PointerEvent::new(50.0, 50.0, W, H);

        controller.on_mouse_down(&mut scene, &event);
        controller.on_mouse_up(&mut scene, &event);
        assert!(controller.in_progress().is_none());
        assert!(controller.camera_at_drag_start().is_none());
        assert_eq!(scene.objects().len(), 1);

        // Moving after release leaves the shape alone.
        controller.on_mouse_move(&mut scene, &PointerEvent::new(0.0, 0.0, W, H));
        assert_eq!(scene.objects()[0].scale, Vector3::new(0.1, 0.1, 0.1));

        // The next press starts a new shape.
        controller.on_mouse_down(&mut scene, &event);
        assert_eq!(scene.objects().len(), 2);
        assert_ne!(scene.objects()[0].id(), scene.objects()[1].id());
    }

    #[test]
    fn test_click_adds_fixed_copy_at_origin() {
        let mut scene = Scene::new(Camera::default());
        let mut controller = controller();
        controller.on_click(&mut scene, &PointerEvent::new(10.0, 10.0, W, H));

        let shape = &scene.objects()[0];
        assert_eq!(shape.translation, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(shape.scale, Vector3::new(0.05, 0.05, 0.05));
        assert!(controller.in_progress().is_none());
    }
}
