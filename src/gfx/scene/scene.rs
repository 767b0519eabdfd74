use cgmath::{Vector3, Vector4};
use uuid::Uuid;

use crate::gfx::camera::Camera;

use super::light::PointLight;
use super::object::SceneObject;

/// Main scene containing objects, lights and the camera
///
/// Objects are drawn in insertion order. `time` starts at zero and only moves
/// forward, by `delta_time`, each time [`update`](Scene::update) runs.
#[derive(Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    camera: Camera,
    pub ambient_light: Vector3<f32>,
    point_lights: Vec<PointLight>,
    pub background_color: Vector4<f32>,
    delta_time: f32,
    time: f32,
}

impl Scene {
    /// Creates an empty scene viewed through `camera`
    pub fn new(camera: Camera) -> Self {
        Self {
            objects: Vec::new(),
            camera,
            ambient_light: Vector3::new(0.1, 0.1, 0.1),
            point_lights: Vec::new(),
            background_color: Vector4::new(0.05, 0.25, 0.05, 1.0),
            delta_time: 0.001,
            time: 0.0,
        }
    }

    /// Appends an object and returns its id
    pub fn add_object(&mut self, object: SceneObject) -> Uuid {
        let id = object.id();
        self.objects.push(object);
        id
    }

    /// Removes the object with `id`, returning it if it was present. Its GPU
    /// resources live on until it's passed to
    /// [`Renderer::release_object`](crate::gfx::rendering::Renderer::release_object).
    pub fn delete_object(&mut self, id: Uuid) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        Some(self.objects.remove(index))
    }

    pub fn object(&self, id: Uuid) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn object_mut(&mut self, id: Uuid) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_background_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.background_color = Vector4::new(r, g, b, a);
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn set_delta_time(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
    }

    /// Advances time by one step
    pub fn tick(&mut self) {
        self.time += self.delta_time;
    }

    /// Runs the camera hook, then every object hook in draw order, then ticks.
    /// Hooks all see the time from before the tick.
    pub fn update(&mut self) {
        let time = self.time;

        if let Some(hook) = self.camera.update_hook() {
            hook(time, &mut self.camera);
        }

        for object in &mut self.objects {
            if let Some(hook) = object.update_hook() {
                hook(time, object);
            }
        }

        self.tick();
    }

    /// Forces every object to upload its GPU resources again
    pub fn reset_created(&mut self) {
        for object in &mut self.objects {
            object.reset_created();
        }
    }
}
