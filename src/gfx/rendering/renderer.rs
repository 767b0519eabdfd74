//! # GPU resource manager
//!
//! [`Renderer`] walks a [`Scene`], creates each GPU resource the first time it
//! sees it and binds everything again on every frame.
//!
//! Creation is guarded by each resource's state, so preprocessing the same
//! scene twice costs nothing the second time. A resource is only marked as
//! created after the backend call succeeded, so a failed creation is retried
//! on the next frame.
//!
//! Failures while preparing one object only take that object out of the
//! frame. Global failures (shader compilation, program link) abort it.

use std::collections::HashSet;

use cgmath::Vector3;
use log::{debug, error, trace, warn};
use uuid::Uuid;

use crate::errors::Result;
use crate::gfx::camera::convert_matrix4_to_array;
use crate::gfx::rendering::backend::{GraphicsApi, ResourceHandle};
use crate::gfx::resources::gpu_resource::GpuResource;
use crate::gfx::resources::material::{Material, MaterialValue};
use crate::gfx::resources::shader::Shader;
use crate::gfx::scene::{Scene, SceneObject};

/// Per-frame values every object receives.
struct FrameUniforms {
    perspective: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    ambient_light: [f32; 4],
    light_position: [f32; 4],
}

impl FrameUniforms {
    fn from_scene(scene: &Scene) -> Self {
        let camera = scene.camera();
        let light = scene
            .lights()
            .first()
            .map(|light| light.position)
            .unwrap_or(Vector3::new(0.0, 0.0, 0.0));

        Self {
            perspective: convert_matrix4_to_array(camera.projection_matrix()),
            view: convert_matrix4_to_array(camera.view_matrix()),
            ambient_light: scene.ambient_light.extend(1.0).into(),
            light_position: light.extend(1.0).into(),
        }
    }
}

pub struct Renderer<G: GraphicsApi> {
    gfx: G,
    skipped: HashSet<Uuid>,
}

impl<G: GraphicsApi> Renderer<G> {
    pub fn new(gfx: G) -> Self {
        Self {
            gfx,
            skipped: HashSet::new(),
        }
    }

    pub fn graphics(&self) -> &G {
        &self.gfx
    }

    pub fn graphics_mut(&mut self) -> &mut G {
        &mut self.gfx
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        debug!("Viewport set to {}x{}", width, height);
        self.gfx.set_viewport(width, height);
    }

    /// Objects left out of the last frame because their resources failed.
    pub fn skipped(&self) -> &HashSet<Uuid> {
        &self.skipped
    }

    /// Creates every resource the scene references that doesn't exist yet.
    pub fn preprocess_scene(&mut self, scene: &mut Scene) -> Result<()> {
        self.gfx.set_depth_test(true);
        self.gfx.set_blend(true);
        self.skipped.clear();

        for object in scene.objects_mut() {
            if let Err(err) = prepare_object(&mut self.gfx, object) {
                if err.is_global() {
                    return Err(err);
                }
                warn!(
                    "Skipping object '{}' ({}) this frame: {}",
                    object.name,
                    object.id(),
                    err
                );
                self.skipped.insert(object.id());
            }
        }

        self.gfx.set_clear_color(scene.background_color.into());
        Ok(())
    }

    /// Runs one frame: clear, update the scene, create new resources, then
    /// bind and draw every object in insertion order.
    pub fn draw_scene(&mut self, scene: &mut Scene) -> Result<()> {
        self.gfx.clear();
        scene.update();

        if let Err(err) = self.preprocess_scene(scene) {
            error!("Frame aborted while preparing resources: {}", err);
            return Err(err);
        }

        let frame = FrameUniforms::from_scene(scene);
        let mut drawn = 0;
        for object in scene.objects() {
            if self.skipped.contains(&object.id()) {
                continue;
            }

            let result = self.draw_object(object, &frame);
            let unbound = self.unbind_object();
            if let Err(err) = result.and(unbound) {
                error!("Frame aborted while drawing '{}': {}", object.name, err);
                return Err(err);
            }
            drawn += 1;
        }

        trace!("Drew {} of {} objects", drawn, scene.objects().len());
        self.gfx.present().inspect_err(|err| {
            error!("Frame lost at present: {}", err);
        })
    }

    /// Frees every GPU resource `object` holds and marks them uncreated, so
    /// the object uploads again if it's drawn later. Call it on objects
    /// returned by [`Scene::delete_object`].
    pub fn release_object(&mut self, object: &mut SceneObject) {
        self.skipped.remove(&object.id());

        let mesh = &mut object.mesh;
        release(&mut self.gfx, mesh.vertex_buffer_mut().resource_mut());
        release(&mut self.gfx, mesh.index_buffer_mut().resource_mut());
        release(&mut self.gfx, mesh.layout_mut().resource_mut());

        let program = &mut object.material.program;
        release(&mut self.gfx, program.resource_mut());
        release(&mut self.gfx, program.vertex.resource_mut());
        release(&mut self.gfx, program.fragment.resource_mut());

        for property in object.material.properties_mut() {
            if let MaterialValue::Texture(texture) = &mut property.value {
                release(&mut self.gfx, texture.resource_mut());
                texture.reset_created();
            }
        }
    }

    fn draw_object(&mut self, object: &SceneObject, frame: &FrameUniforms) -> Result<()> {
        let owner = Some(object.id());
        let mesh = &object.mesh;

        self.gfx
            .bind_vertex_buffer(mesh.vertex_buffer().resource().require(owner)?)?;
        self.gfx
            .bind_vertex_layout(mesh.layout().resource().require(owner)?)?;
        self.gfx
            .bind_index_buffer(mesh.index_buffer().resource().require(owner)?)?;

        let program = self.bind_material(&object.material, owner)?;

        self.gfx
            .set_uniform_mat4(program, "perspective", frame.perspective)?;
        self.gfx.set_uniform_mat4(program, "view", frame.view)?;
        self.gfx.set_uniform_mat4(
            program,
            "transform",
            convert_matrix4_to_array(object.transform()),
        )?;
        self.gfx
            .set_uniform_vec4(program, "ambient_light", frame.ambient_light)?;
        self.gfx
            .set_uniform_vec4(program, "light_position", frame.light_position)?;

        self.gfx.draw_indexed_triangles(mesh.index_count())
    }

    /// Activates the material's program and feeds it every property.
    fn bind_material(&mut self, material: &Material, owner: Option<Uuid>) -> Result<ResourceHandle> {
        let program = material.program.resource().require(owner)?;
        self.gfx.use_program(Some(program))?;

        for property in material.properties() {
            let name = property.name.as_str();
            match &property.value {
                MaterialValue::Mat4(matrix) => self.gfx.set_uniform_mat4(program, name, *matrix)?,
                // A material holds at most one texture.
                MaterialValue::Texture(texture) => {
                    self.gfx.bind_texture(0, texture.resource().require(owner)?)?;
                    self.gfx.set_uniform_i32(program, name, 0)?;
                }
                value => {
                    if let Some(vec4) = value.as_vec4() {
                        self.gfx.set_uniform_vec4(program, name, vec4)?;
                    }
                }
            }
        }

        Ok(program)
    }

    fn unbind_object(&mut self) -> Result<()> {
        self.gfx.unbind_vertex_buffer();
        self.gfx.unbind_index_buffer();
        self.gfx.use_program(None)
    }
}

fn mark_created(resource: &mut GpuResource, handle: ResourceHandle, owner: Uuid) {
    resource.mark_created(handle);
    debug!("Created {} {:?} for object {}", resource.kind(), handle, owner);
}

fn release<G: GraphicsApi>(gfx: &mut G, resource: &mut GpuResource) {
    if let Some(handle) = resource.handle() {
        gfx.release(resource.kind(), handle);
        resource.reset();
    }
}

fn prepare_shader<G: GraphicsApi>(gfx: &mut G, shader: &mut Shader, owner: Uuid) -> Result<ResourceHandle> {
    if let Some(handle) = shader.resource().handle() {
        return Ok(handle);
    }
    let handle = gfx.create_shader(shader.stage(), shader.source())?;
    mark_created(shader.resource_mut(), handle, owner);
    Ok(handle)
}

fn prepare_object<G: GraphicsApi>(gfx: &mut G, object: &mut SceneObject) -> Result<()> {
    let owner = object.id();
    let mesh = &mut object.mesh;

    let vertex_buffer = mesh.vertex_buffer_mut();
    if !vertex_buffer.resource().is_created() {
        let handle = gfx.create_vertex_buffer(vertex_buffer.bytes())?;
        mark_created(vertex_buffer.resource_mut(), handle, owner);
    }

    let index_buffer = mesh.index_buffer_mut();
    if !index_buffer.resource().is_created() {
        let handle = gfx.create_index_buffer(index_buffer.bytes())?;
        mark_created(index_buffer.resource_mut(), handle, owner);
    }

    let program = &mut object.material.program;
    let program_handle = match program.resource().handle() {
        Some(handle) => handle,
        None => {
            let vertex = prepare_shader(gfx, &mut program.vertex, owner)?;
            let fragment = prepare_shader(gfx, &mut program.fragment, owner)?;
            let handle = gfx.create_program(vertex, fragment, program.uniforms())?;
            mark_created(program.resource_mut(), handle, owner);
            handle
        }
    };

    let layout = mesh.layout_mut();
    if !layout.resource().is_created() {
        let handle = gfx.configure_vertex_layout(program_handle, layout)?;
        mark_created(layout.resource_mut(), handle, owner);
    }

    for property in object.material.properties_mut() {
        if let MaterialValue::Texture(texture) = &mut property.value {
            let handle = match texture.resource().handle() {
                Some(handle) => handle,
                None => {
                    let handle = gfx.create_texture()?;
                    mark_created(texture.resource_mut(), handle, owner);
                    handle
                }
            };
            if !texture.is_loaded() {
                gfx.upload_texture(handle, texture.width(), texture.height(), texture.pixels())?;
                texture.mark_loaded();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RenderError;
    use crate::gfx::camera::Camera;
    use crate::gfx::rendering::testing::{Call, RecordingBackend};
    use crate::gfx::resources::gpu_resource::ResourceKind;
    use crate::gfx::resources::shader::ShaderStage;
    use crate::gfx::resources::texture::Texture;
    use crate::gfx::shapes;

    fn scene() -> Scene {
        let mut scene = Scene::new(Camera::default());
        scene.add_object(shapes::cube().unwrap());
        scene.add_object(shapes::sphere(4).unwrap());
        scene
    }

    fn renderer() -> Renderer<RecordingBackend> {
        Renderer::new(RecordingBackend::new())
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let mut scene = scene();
        let mut renderer = renderer();

        renderer.preprocess_scene(&mut scene).unwrap();
        // Two buffers, two shaders, a program and a layout per object.
        assert_eq!(renderer.graphics().creation_count(), 12);

        renderer.preprocess_scene(&mut scene).unwrap();
        assert_eq!(renderer.graphics().creation_count(), 12);

        for object in scene.objects() {
            assert!(object.mesh.vertex_buffer().resource().is_created());
            assert!(object.mesh.index_buffer().resource().is_created());
            assert!(object.mesh.layout().resource().is_created());
            assert!(object.material.program.vertex.resource().is_created());
            assert!(object.material.program.fragment.resource().is_created());
            assert!(object.material.program.resource().is_created());
        }
    }

    #[test]
    fn test_draw_binds_and_unbinds_each_object_in_order() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.draw_scene(&mut scene).unwrap();

        let backend = renderer.graphics();
        assert_eq!(backend.draws(), vec![36, 6 * 4 * 4]);
        assert_eq!(backend.calls.first(), Some(&Call::Clear));
        assert_eq!(backend.calls.last(), Some(&Call::Present));

        // Every draw is followed by a full unbind before anything else is bound.
        for (i, call) in backend.calls.iter().enumerate() {
            if let Call::Draw(_) = call {
                assert_eq!(
                    &backend.calls[i + 1..i + 4],
                    &[
                        Call::UnbindVertexBuffer,
                        Call::UnbindIndexBuffer,
                        Call::UseProgram(None)
                    ]
                );
            }
        }

        let cube_vb = scene.objects()[0].mesh.vertex_buffer().resource().handle().unwrap();
        let first_bind = backend
            .calls
            .iter()
            .find(|c| matches!(c, Call::BindVertexBuffer(_)));
        assert_eq!(first_bind, Some(&Call::BindVertexBuffer(cube_vb)));
    }

    #[test]
    fn test_camera_and_transform_uniforms_set_per_object() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.draw_scene(&mut scene).unwrap();

        let backend = renderer.graphics();
        for name in ["perspective", "view", "transform", "color", "light_position"] {
            assert_eq!(backend.count(&Call::SetUniform(name.to_string())), 2, "{}", name);
        }
    }

    #[test]
    fn test_frames_advance_time_once() {
        let mut scene = scene();
        scene.set_delta_time(0.5);
        let mut renderer = renderer();
        for _ in 0..4 {
            renderer.draw_scene(&mut scene).unwrap();
        }
        assert!((scene.time() - 2.0).abs() < 1e-6);
        assert_eq!(renderer.graphics().creation_count(), 12);
        assert_eq!(renderer.graphics().draws().len(), 8);
    }

    #[test]
    fn test_shader_failure_aborts_frame_and_retries() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.graphics_mut().fail_shader = Some(ShaderStage::Fragment);

        let err = renderer.draw_scene(&mut scene).unwrap_err();
        assert!(matches!(err, RenderError::ShaderCompilation { .. }));
        assert!(renderer.graphics().draws().is_empty());
        assert_eq!(renderer.graphics().count(&Call::Present), 0);

        let program = &scene.objects()[0].material.program;
        assert!(program.vertex.resource().is_created());
        assert!(!program.fragment.resource().is_created());
        assert!(!program.resource().is_created());

        renderer.graphics_mut().fail_shader = None;
        renderer.draw_scene(&mut scene).unwrap();
        assert_eq!(renderer.graphics().draws().len(), 2);
        // The vertex shader that made it the first time is not compiled again.
        assert_eq!(
            renderer
                .graphics()
                .count(&Call::CreateShader(ShaderStage::Vertex)),
            2
        );
    }

    #[test]
    fn test_per_object_failure_skips_object() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.graphics_mut().fail_vertex_buffers = true;

        renderer.draw_scene(&mut scene).unwrap();
        assert!(renderer.graphics().draws().is_empty());
        assert_eq!(renderer.skipped().len(), 2);
        assert_eq!(renderer.graphics().count(&Call::Present), 1);

        renderer.graphics_mut().fail_vertex_buffers = false;
        renderer.draw_scene(&mut scene).unwrap();
        assert!(renderer.skipped().is_empty());
        assert_eq!(renderer.graphics().draws().len(), 2);
    }

    #[test]
    fn test_reset_created_uploads_again() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.preprocess_scene(&mut scene).unwrap();

        scene.reset_created();
        assert!(!scene.objects()[0].mesh.vertex_buffer().resource().is_created());

        renderer.preprocess_scene(&mut scene).unwrap();
        assert_eq!(renderer.graphics().creation_count(), 24);
    }

    #[test]
    fn test_objects_added_between_frames_are_created() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.draw_scene(&mut scene).unwrap();

        let copy = scene.objects()[0].clone();
        scene.add_object(copy);
        renderer.draw_scene(&mut scene).unwrap();

        assert_eq!(renderer.graphics().creation_count(), 18);
        assert_eq!(renderer.graphics().draws().len(), 5);
    }

    #[test]
    fn test_textures_created_and_uploaded_once() {
        let mut scene = Scene::new(Camera::default());
        let texture = shapes::checkerboard(4, 2, [255; 4], [0, 0, 0, 255]).unwrap();
        scene.add_object(shapes::textured_cube(texture).unwrap());

        let mut renderer = renderer();
        renderer.draw_scene(&mut scene).unwrap();
        renderer.draw_scene(&mut scene).unwrap();

        let backend = renderer.graphics();
        assert_eq!(backend.count(&Call::CreateTexture), 1);
        let handle = match scene.objects()[0].material.property("texture") {
            Some(MaterialValue::Texture(texture)) => {
                assert!(texture.is_loaded());
                texture.resource().handle().unwrap()
            }
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(backend.count(&Call::UploadTexture(handle)), 1);
        assert_eq!(backend.count(&Call::BindTexture(0, handle)), 2);
        assert_eq!(backend.count(&Call::SetUniform("texture".to_string())), 2);
    }

    #[test]
    fn test_binding_before_creation_names_resource_and_owner() {
        let scene = scene();
        let mut renderer = renderer();
        let frame = FrameUniforms::from_scene(&scene);
        let object = &scene.objects()[0];

        match renderer.draw_object(object, &frame) {
            Err(RenderError::ResourceNotCreated { kind, owner }) => {
                assert_eq!(kind, ResourceKind::VertexBuffer);
                assert_eq!(owner, Some(object.id()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_single_pixel_texture_draws() {
        let mut scene = Scene::new(Camera::default());
        let object = shapes::textured_cube(Texture::solid("red", [255, 0, 0, 255])).unwrap();
        scene.add_object(object);

        let mut renderer = renderer();
        renderer.draw_scene(&mut scene).unwrap();
        assert_eq!(renderer.graphics().draws(), vec![36]);
    }

    #[test]
    fn test_present_failure_is_returned_after_drawing() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.graphics_mut().fail_present = true;

        let err = renderer.draw_scene(&mut scene).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Surface(wgpu::SurfaceError::OutOfMemory)
        ));
        assert!(err.is_fatal());
        // Everything was drawn before the surface failed.
        assert_eq!(renderer.graphics().draws().len(), 2);
        assert_eq!(renderer.graphics().count(&Call::Present), 1);
    }

    #[test]
    fn test_released_object_frees_its_handles() {
        let mut scene = scene();
        let mut renderer = renderer();
        renderer.draw_scene(&mut scene).unwrap();

        let id = scene.objects()[0].id();
        let mut removed = scene.delete_object(id).unwrap();
        let old = removed.mesh.vertex_buffer().resource().handle().unwrap();
        renderer.release_object(&mut removed);

        // Buffers, layout, program and both shaders.
        assert_eq!(renderer.graphics().releases(), 6);
        assert!(renderer
            .graphics()
            .calls
            .contains(&Call::Release(ResourceKind::VertexBuffer, old)));
        assert!(!removed.mesh.vertex_buffer().resource().is_created());
        assert!(!removed.material.program.resource().is_created());

        // The old handle is gone from the backend.
        assert!(matches!(
            renderer.graphics_mut().bind_vertex_buffer(old),
            Err(RenderError::UnknownHandle { .. })
        ));

        // The rest of the scene keeps drawing.
        renderer.draw_scene(&mut scene).unwrap();
        assert_eq!(renderer.graphics().draws().len(), 3);
    }
}
