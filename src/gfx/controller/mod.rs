//! # Input controllers
//!
//! A [`Controller`] turns pointer input into scene mutations. Every handler
//! has a no-op default, so a controller only implements the events it cares
//! about. The app translates window events into [`InputEvent`]s and hands
//! them to [`dispatch`].

pub mod add_shape;
pub mod orbit;

pub use add_shape::AddShapeController;
pub use orbit::OrbitController;

use cgmath::Vector2;

use crate::gfx::scene::Scene;

/// Pointer state in device pixels, plus the size of the surface it happened
/// on. `delta_y` carries the wheel delta and is zero for other events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub target_width: f32,
    pub target_height: f32,
    /// Positive scrolls down, toward the user.
    pub delta_y: f32,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, target_width: f32, target_height: f32) -> Self {
        Self {
            x,
            y,
            target_width,
            target_height,
            delta_y: 0.0,
        }
    }

    pub fn with_delta_y(mut self, delta_y: f32) -> Self {
        self.delta_y = delta_y;
        self
    }

    /// Position mapped to `[-1, 1]²` with +y up.
    pub fn normalized(&self) -> Vector2<f32> {
        Vector2::new(
            (self.x / self.target_width - 0.5) * 2.0,
            (1.0 - self.y / self.target_height - 0.5) * 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Click(PointerEvent),
    Drag(PointerEvent),
    MouseMove(PointerEvent),
    MouseDown(PointerEvent),
    MouseUp(PointerEvent),
    Wheel(PointerEvent),
}

pub trait Controller {
    fn name(&self) -> &str;

    fn on_click(&mut self, _scene: &mut Scene, _event: &PointerEvent) {}
    fn on_drag(&mut self, _scene: &mut Scene, _event: &PointerEvent) {}
    fn on_mouse_move(&mut self, _scene: &mut Scene, _event: &PointerEvent) {}
    fn on_mouse_down(&mut self, _scene: &mut Scene, _event: &PointerEvent) {}
    fn on_mouse_up(&mut self, _scene: &mut Scene, _event: &PointerEvent) {}
    fn on_wheel(&mut self, _scene: &mut Scene, _event: &PointerEvent) {}
}

/// Routes an input event to the matching controller handler.
pub fn dispatch(controller: &mut dyn Controller, scene: &mut Scene, event: &InputEvent) {
    match event {
        InputEvent::Click(e) => controller.on_click(scene, e),
        InputEvent::Drag(e) => controller.on_drag(scene, e),
        InputEvent::MouseMove(e) => controller.on_mouse_move(scene, e),
        InputEvent::MouseDown(e) => controller.on_mouse_down(scene, e),
        InputEvent::MouseUp(e) => controller.on_mouse_up(scene, e),
        InputEvent::Wheel(e) => controller.on_wheel(scene, e),
    }
}
