//! Window, event loop and frame pacing.
//!
//! [`OrreryApp`] owns the [`Scene`] and the active input [`Controller`]. When
//! winit resumes it creates the window and a [`Renderer`] over a
//! [`WgpuBackend`], then draws one frame per `RedrawRequested`.

use std::sync::Arc;

use cgmath::{Vector3, Vector4};
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::errors::{RenderError, Result};
use crate::gfx::{
    camera::Camera,
    controller::{dispatch, AddShapeController, Controller, InputEvent, OrbitController, PointerEvent},
    rendering::{Renderer, WgpuBackend},
    scene::{Scene, SceneObject},
    shapes,
};

/// Startup settings for [`OrreryApp`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub delta_time: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub background_color: [f32; 4],
    pub ambient_light: [f32; 3],
    pub camera_position: [f32; 3],
    pub orbit_sensitivity: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 1200,
            height: 800,
            delta_time: 0.001,
            fov_y_degrees: 45.0,
            near: 0.01,
            far: 1000.0,
            background_color: [0.05, 0.25, 0.05, 1.0],
            ambient_light: [0.1, 0.1, 0.1],
            camera_position: [0.0, 0.0, 2.0],
            orbit_sensitivity: OrbitController::DEFAULT_SENSITIVITY,
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_delta_time(mut self, delta_time: f32) -> Self {
        self.delta_time = delta_time;
        self
    }

    pub fn with_perspective(mut self, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_y_degrees = fov_y_degrees;
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_background_color(mut self, rgba: [f32; 4]) -> Self {
        self.background_color = rgba;
        self
    }

    pub fn with_ambient_light(mut self, rgb: [f32; 3]) -> Self {
        self.ambient_light = rgb;
        self
    }

    pub fn with_camera_position(mut self, position: [f32; 3]) -> Self {
        self.camera_position = position;
        self
    }

    pub fn with_orbit_sensitivity(mut self, sensitivity: f32) -> Self {
        self.orbit_sensitivity = sensitivity;
        self
    }

    fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Camera and scene built from these settings.
    pub fn build_scene(&self) -> Scene {
        let camera = Camera::new(self.aspect_ratio())
            .with_perspective(self.fov_y_degrees, self.near, self.far)
            .with_translation(Vector3::from(self.camera_position));

        let mut scene = Scene::new(camera);
        scene.set_delta_time(self.delta_time);
        scene.ambient_light = Vector3::from(self.ambient_light);
        scene.background_color = Vector4::from(self.background_color);
        scene
    }
}

pub struct OrreryApp {
    config: AppConfig,
    scene: Scene,
    shape_template: Option<SceneObject>,
}

impl OrreryApp {
    pub fn new(config: AppConfig) -> Self {
        let scene = config.build_scene();
        Self {
            config,
            scene,
            shape_template: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Object the add-shape controller copies. Defaults to [`shapes::cube`].
    pub fn set_shape_template(&mut self, template: SceneObject) {
        self.shape_template = Some(template);
    }

    /// Opens the window and runs until it closes.
    pub fn run(self) -> Result<()> {
        let template = match self.shape_template {
            Some(template) => template,
            None => shapes::cube()?,
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState {
            controller: Box::new(OrbitController::with_sensitivity(
                self.config.orbit_sensitivity,
            )),
            config: self.config,
            scene: self.scene,
            template,
            window: None,
            renderer: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
            button_down: false,
            error: None,
        };

        event_loop.run_app(&mut state)?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct AppState {
    config: AppConfig,
    scene: Scene,
    template: SceneObject,
    controller: Box<dyn Controller>,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer<WgpuBackend>>,
    cursor: PhysicalPosition<f64>,
    button_down: bool,
    /// Startup or fatal frame failure reported once the event loop returns.
    error: Option<RenderError>,
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.title.clone())
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
        )?;
        let window = Arc::new(window);
        let PhysicalSize { width, height } = window.inner_size();
        info!("Window created: {}x{}", width, height);

        let backend = pollster::block_on(WgpuBackend::new(window.clone(), width, height))?;
        let mut renderer = Renderer::new(backend);
        renderer.set_viewport(width, height);
        if height > 0 {
            self.scene
                .camera_mut()
                .set_aspect_ratio(width as f32 / height as f32);
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn pointer(&self) -> Option<PointerEvent> {
        let size = self.window.as_ref()?.inner_size();
        Some(PointerEvent::new(
            self.cursor.x as f32,
            self.cursor.y as f32,
            size.width as f32,
            size.height as f32,
        ))
    }

    fn send(&mut self, event: InputEvent) {
        dispatch(self.controller.as_mut(), &mut self.scene, &event);
    }

    fn install_controller(&mut self, controller: Box<dyn Controller>) {
        info!("Switched to {} controller", controller.name());
        self.controller = controller;
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::KeyC => {
                let controller = AddShapeController::new(self.template.clone());
                self.install_controller(Box::new(controller));
            }
            KeyCode::KeyO => {
                let controller = OrbitController::with_sensitivity(self.config.orbit_sensitivity);
                self.install_controller(Box::new(controller));
            }
            KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.scene
            .camera_mut()
            .set_aspect_ratio(width as f32 / height as f32);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_viewport(width, height);
        }
    }
}

/// The renderer logs every failed frame. Only fatal ones end the loop, the
/// rest are retried on the next redraw.
fn should_stop(err: &RenderError) -> bool {
    err.is_fatal()
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init(event_loop) {
            error!("Failed to start: {}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::Resized(PhysicalSize { width, height }) => self.resize(width, height),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                if let Some(pointer) = self.pointer() {
                    self.send(InputEvent::MouseMove(pointer));
                    if self.button_down {
                        self.send(InputEvent::Drag(pointer));
                    }
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let Some(pointer) = self.pointer() else {
                    return;
                };
                match state {
                    ElementState::Pressed => {
                        self.button_down = true;
                        self.send(InputEvent::MouseDown(pointer));
                    }
                    ElementState::Released => {
                        self.button_down = false;
                        self.send(InputEvent::MouseUp(pointer));
                        self.send(InputEvent::Click(pointer));
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports wheel-up as positive, the controllers expect
                // positive to mean scrolling down.
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                if let Some(pointer) = self.pointer() {
                    self.send(InputEvent::Wheel(pointer.with_delta_y(delta_y)));
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };
                if let Err(err) = renderer.draw_scene(&mut self.scene) {
                    if should_stop(&err) {
                        error!("Stopping after unrecoverable render error: {}", err);
                        self.error = Some(err);
                        event_loop.exit();
                    }
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (1200, 800));
        assert_eq!(config.delta_time, 0.001);
        assert_eq!(config.orbit_sensitivity, 1.3);
        assert_eq!(config.camera_position, [0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_frame_errors_stop_only_when_fatal() {
        assert!(should_stop(&RenderError::Surface(
            wgpu::SurfaceError::OutOfMemory
        )));
        assert!(!should_stop(&RenderError::Surface(
            wgpu::SurfaceError::Timeout
        )));
        assert!(!should_stop(&RenderError::ProgramLink {
            message: "missing entry point".to_string(),
        }));
    }

    #[test]
    fn test_build_scene_applies_settings() {
        let config = AppConfig::default()
            .with_size(400, 200)
            .with_delta_time(0.5)
            .with_camera_position([0.0, 1.0, 5.0])
            .with_background_color([0.0, 0.0, 0.0, 1.0])
            .with_ambient_light([0.2, 0.2, 0.2]);
        let scene = config.build_scene();

        assert_eq!(scene.camera().aspect_ratio, 2.0);
        assert_eq!(scene.camera().translation, Vector3::new(0.0, 1.0, 5.0));
        assert_eq!(scene.delta_time(), 0.5);
        assert_eq!(scene.ambient_light, Vector3::new(0.2, 0.2, 0.2));
        assert_eq!(scene.background_color, Vector4::new(0.0, 0.0, 0.0, 1.0));
    }
}
