//! [`GraphicsApi`] on top of wgpu.
//!
//! The trait is GL-shaped (bind state, set uniforms by name, draw), while wgpu
//! wants everything recorded into a render pass. The backend bridges the two:
//!
//! - Programs keep their uniform values in a CPU-side block, like GL keeps
//!   uniform state per program. Every draw snapshots the block into a frame
//!   buffer addressed by dynamic offset.
//! - Draws are recorded between [`clear`](GraphicsApi::clear) and
//!   [`present`](GraphicsApi::present), then encoded into one render pass.
//! - A render pipeline is built per (vertex layout, program, depth/blend state)
//!   the first time that combination is drawn.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use log::{debug, info, trace, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::errors::{RenderError, Result};
use crate::gfx::rendering::backend::{GraphicsApi, ResourceHandle};
use crate::gfx::rendering::gpu_texture::GpuTexture;
use crate::gfx::resources::gpu_resource::ResourceKind;
use crate::gfx::resources::shader::{ShaderStage, UniformKind, UniformLayout};
use crate::gfx::scene::vertex::VertexLayout;
use crate::wgpu_utils::{self, align_to, DynamicUniformBuffer};

const INITIAL_UNIFORM_CAPACITY: u64 = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineState {
    depth_test: bool,
    blend: bool,
}

struct ShaderEntry {
    stage: ShaderStage,
    module: wgpu::ShaderModule,
}

struct ProgramEntry {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    uniforms: UniformLayout,
    values: Vec<u8>,
    block_size: NonZeroU64,
    uniform_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    /// Rebuilt whenever the frame uniform buffer is reallocated.
    uniform_bind_group: Option<wgpu::BindGroup>,
}

struct LayoutEntry {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Bindings {
    vertex_buffer: Option<ResourceHandle>,
    index_buffer: Option<ResourceHandle>,
    layout: Option<ResourceHandle>,
    program: Option<ResourceHandle>,
    texture: Option<ResourceHandle>,
}

struct DrawCommand {
    vertex_buffer: ResourceHandle,
    index_buffer: ResourceHandle,
    layout: ResourceHandle,
    program: ResourceHandle,
    texture: Option<ResourceHandle>,
    state: PipelineState,
    uniform_offset: u32,
    index_count: u32,
}

pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: GpuTexture,

    next_handle: u64,
    vertex_buffers: HashMap<ResourceHandle, wgpu::Buffer>,
    index_buffers: HashMap<ResourceHandle, wgpu::Buffer>,
    shaders: HashMap<ResourceHandle, ShaderEntry>,
    programs: HashMap<ResourceHandle, ProgramEntry>,
    layouts: HashMap<ResourceHandle, LayoutEntry>,
    /// Texture bind groups, `None` until the first upload.
    textures: HashMap<ResourceHandle, Option<wgpu::BindGroup>>,
    pipelines: HashMap<(ResourceHandle, ResourceHandle, PipelineState), wgpu::RenderPipeline>,

    texture_layout: wgpu::BindGroupLayout,
    default_texture: wgpu::BindGroup,

    uniform_buffer: DynamicUniformBuffer,
    frame_uniforms: Vec<u8>,
    draws: Vec<DrawCommand>,
    bound: Bindings,
    state: PipelineState,
    clear_color: wgpu::Color,
}

impl WgpuBackend {
    /// Creates the surface, device and default resources for `window`.
    pub async fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| RenderError::AdapterRequest(err.to_string()))?;
        info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Orrery Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RenderError::AdapterRequest("surface reports no formats".into()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!("Surface configured: {}x{} {:?}", config.width, config.height, format);

        let depth_texture = GpuTexture::create_depth_texture(&device, &config, "depth_texture");

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu_utils::texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu_utils::sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Programs that sample a texture still draw when none is bound.
        let white = GpuTexture::from_rgba(&device, &queue, &[255; 4], 1, 1, "Default Texture");
        let default_texture = texture_bind_group(&device, &texture_layout, &white, "Default Texture");

        let uniform_buffer = DynamicUniformBuffer::new(&device, INITIAL_UNIFORM_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            next_handle: 0,
            vertex_buffers: HashMap::new(),
            index_buffers: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            layouts: HashMap::new(),
            textures: HashMap::new(),
            pipelines: HashMap::new(),
            texture_layout,
            default_texture,
            uniform_buffer,
            frame_uniforms: Vec::new(),
            draws: Vec::new(),
            bound: Bindings::default(),
            state: PipelineState {
                depth_test: true,
                blend: true,
            },
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn issue(&mut self) -> ResourceHandle {
        self.next_handle += 1;
        ResourceHandle(self.next_handle)
    }

    fn unknown(kind: ResourceKind, handle: ResourceHandle) -> RenderError {
        RenderError::UnknownHandle { kind, handle }
    }

    fn program_mut(&mut self, program: ResourceHandle) -> Result<&mut ProgramEntry> {
        self.programs
            .get_mut(&program)
            .ok_or_else(|| Self::unknown(ResourceKind::ShaderProgram, program))
    }

    /// Copies `bytes` into the program's uniform block if it declares `name`
    /// with a matching kind.
    fn write_uniform(
        &mut self,
        program: ResourceHandle,
        name: &str,
        kind: UniformKind,
        bytes: &[u8],
    ) -> Result<()> {
        let entry = self.program_mut(program)?;
        match entry.uniforms.offset_of(name) {
            Some((offset, declared)) if declared == kind => {
                entry.values[offset..offset + bytes.len()].copy_from_slice(bytes);
            }
            Some((_, declared)) => {
                trace!("Uniform '{}' is {:?}, ignoring {:?} value", name, declared, kind);
            }
            None => trace!("Program {:?} has no uniform '{}'", program, name),
        }
        Ok(())
    }

    fn ensure_pipeline(
        &mut self,
        layout: ResourceHandle,
        program: ResourceHandle,
        state: PipelineState,
    ) -> Result<()> {
        if self.pipelines.contains_key(&(layout, program, state)) {
            return Ok(());
        }
        let layout_entry = self
            .layouts
            .get(&layout)
            .ok_or_else(|| Self::unknown(ResourceKind::VertexLayout, layout))?;
        let program_entry = self
            .programs
            .get(&program)
            .ok_or_else(|| Self::unknown(ResourceKind::ShaderProgram, program))?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = build_pipeline(
            &self.device,
            self.config.format,
            program_entry,
            layout_entry,
            state,
        );
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::ProgramLink {
                message: err.to_string(),
            });
        }

        debug!(
            "Built pipeline for layout {:?}, program {:?}, {:?}",
            layout, program, state
        );
        self.pipelines.insert((layout, program, state), pipeline);
        Ok(())
    }

    /// Makes sure every program drawn this frame has a bind group on the
    /// current uniform buffer.
    fn prepare_uniform_bind_groups(&mut self) {
        let required = self.frame_uniforms.len() as u64;
        if self.uniform_buffer.ensure_capacity(&self.device, required) {
            debug!("Frame uniform buffer grown to {} bytes", self.uniform_buffer.size());
            for program in self.programs.values_mut() {
                program.uniform_bind_group = None;
            }
        }

        for draw in &self.draws {
            let Some(program) = self.programs.get_mut(&draw.program) else {
                continue;
            };
            if program.uniform_bind_group.is_none() {
                let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Program Uniforms"),
                    layout: &program.uniform_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.uniform_buffer.binding_resource(program.block_size),
                    }],
                });
                program.uniform_bind_group = Some(bind_group);
            }
        }
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &GpuTexture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    program: &ProgramEntry,
    layout: &LayoutEntry,
    state: PipelineState,
) -> wgpu::RenderPipeline {
    let blend = if state.blend {
        wgpu::BlendState::ALPHA_BLENDING
    } else {
        wgpu::BlendState::REPLACE
    };
    let (depth_write_enabled, depth_compare) = if state.depth_test {
        (true, wgpu::CompareFunction::Less)
    } else {
        (false, wgpu::CompareFunction::Always)
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Object Pipeline"),
        layout: Some(&program.pipeline_layout),
        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: layout.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &layout.attributes,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: GpuTexture::DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl GraphicsApi for WgpuBackend {
    fn create_vertex_buffer(&mut self, data: &[u8]) -> Result<ResourceHandle> {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX,
            });
        let handle = self.issue();
        self.vertex_buffers.insert(handle, buffer);
        Ok(handle)
    }

    fn create_index_buffer(&mut self, data: &[u8]) -> Result<ResourceHandle> {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: data,
                usage: wgpu::BufferUsages::INDEX,
            });
        let handle = self.issue();
        self.index_buffers.insert(handle, buffer);
        Ok(handle)
    }

    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ResourceHandle> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{:?} Shader", stage)),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::ShaderCompilation {
                stage,
                message: err.to_string(),
            });
        }

        let handle = self.issue();
        self.shaders.insert(handle, ShaderEntry { stage, module });
        Ok(handle)
    }

    fn create_program(
        &mut self,
        vertex: ResourceHandle,
        fragment: ResourceHandle,
        uniforms: &UniformLayout,
    ) -> Result<ResourceHandle> {
        let module = |handle: ResourceHandle, stage: ShaderStage| -> Result<wgpu::ShaderModule> {
            match self.shaders.get(&handle) {
                Some(entry) if entry.stage == stage => Ok(entry.module.clone()),
                Some(entry) => Err(RenderError::ProgramLink {
                    message: format!("{:?} shader used as {:?} stage", entry.stage, stage),
                }),
                None => Err(Self::unknown(ResourceKind::Shader, handle)),
            }
        };
        let vertex = module(vertex, ShaderStage::Vertex)?;
        let fragment = module(fragment, ShaderStage::Fragment)?;

        // An empty block still needs a valid binding size.
        let block = uniforms.block_size().max(16) as u64;
        let block_size = NonZeroU64::new(block).ok_or(RenderError::ProgramLink {
            message: "empty uniform block".to_string(),
        })?;

        let uniform_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Program Uniform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu_utils::dynamic_uniform(Some(block_size)),
                    count: None,
                }],
            });

        let mut bind_group_layouts = vec![&uniform_layout];
        if uniforms.has_texture() {
            bind_group_layouts.push(&self.texture_layout);
        }

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Program Layout"),
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &[],
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::ProgramLink {
                message: err.to_string(),
            });
        }

        let handle = self.issue();
        self.programs.insert(
            handle,
            ProgramEntry {
                vertex,
                fragment,
                uniforms: uniforms.clone(),
                values: vec![0; block as usize],
                block_size,
                uniform_layout,
                pipeline_layout,
                uniform_bind_group: None,
            },
        );
        Ok(handle)
    }

    fn configure_vertex_layout(
        &mut self,
        program: ResourceHandle,
        layout: &VertexLayout,
    ) -> Result<ResourceHandle> {
        if !self.programs.contains_key(&program) {
            return Err(Self::unknown(ResourceKind::ShaderProgram, program));
        }

        let handle = self.issue();
        self.layouts.insert(
            handle,
            LayoutEntry {
                stride: layout.stride() as u64,
                attributes: layout.wgpu_attributes(),
            },
        );

        // Build now so link errors surface while preprocessing.
        if let Err(err) = self.ensure_pipeline(handle, program, self.state) {
            self.layouts.remove(&handle);
            return Err(err);
        }
        Ok(handle)
    }

    fn create_texture(&mut self) -> Result<ResourceHandle> {
        let handle = self.issue();
        self.textures.insert(handle, None);
        Ok(handle)
    }

    fn upload_texture(
        &mut self,
        texture: ResourceHandle,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || expected == 0 {
            return Err(RenderError::InvalidTextureData {
                expected,
                found: rgba.len(),
            });
        }

        let gpu = GpuTexture::from_rgba(&self.device, &self.queue, rgba, width, height, "Material Texture");
        let bind_group = texture_bind_group(&self.device, &self.texture_layout, &gpu, "Material Texture");

        let entry = self
            .textures
            .get_mut(&texture)
            .ok_or_else(|| Self::unknown(ResourceKind::Texture, texture))?;
        *entry = Some(bind_group);
        Ok(())
    }

    fn release(&mut self, kind: ResourceKind, handle: ResourceHandle) {
        let released = match kind {
            ResourceKind::VertexBuffer => self.vertex_buffers.remove(&handle).is_some(),
            ResourceKind::IndexBuffer => self.index_buffers.remove(&handle).is_some(),
            ResourceKind::Shader => self.shaders.remove(&handle).is_some(),
            ResourceKind::ShaderProgram => {
                self.pipelines.retain(|(_, program, _), _| *program != handle);
                self.programs.remove(&handle).is_some()
            }
            ResourceKind::VertexLayout => {
                self.pipelines.retain(|(layout, _, _), _| *layout != handle);
                self.layouts.remove(&handle).is_some()
            }
            ResourceKind::Texture => self.textures.remove(&handle).is_some(),
        };
        if released {
            debug!("Released {} {:?}", kind, handle);
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: ResourceHandle) -> Result<()> {
        if !self.vertex_buffers.contains_key(&buffer) {
            return Err(Self::unknown(ResourceKind::VertexBuffer, buffer));
        }
        self.bound.vertex_buffer = Some(buffer);
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: ResourceHandle) -> Result<()> {
        if !self.index_buffers.contains_key(&buffer) {
            return Err(Self::unknown(ResourceKind::IndexBuffer, buffer));
        }
        self.bound.index_buffer = Some(buffer);
        Ok(())
    }

    fn bind_vertex_layout(&mut self, layout: ResourceHandle) -> Result<()> {
        if !self.layouts.contains_key(&layout) {
            return Err(Self::unknown(ResourceKind::VertexLayout, layout));
        }
        self.bound.layout = Some(layout);
        Ok(())
    }

    fn use_program(&mut self, program: Option<ResourceHandle>) -> Result<()> {
        if let Some(handle) = program {
            if !self.programs.contains_key(&handle) {
                return Err(Self::unknown(ResourceKind::ShaderProgram, handle));
            }
        } else {
            // Unbinding the program ends the object's material state.
            self.bound.texture = None;
            self.bound.layout = None;
        }
        self.bound.program = program;
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: ResourceHandle) -> Result<()> {
        if !self.textures.contains_key(&texture) {
            return Err(Self::unknown(ResourceKind::Texture, texture));
        }
        if unit != 0 {
            trace!("Only texture unit 0 is sampled, ignoring unit {}", unit);
            return Ok(());
        }
        self.bound.texture = Some(texture);
        Ok(())
    }

    fn unbind_vertex_buffer(&mut self) {
        self.bound.vertex_buffer = None;
    }

    fn unbind_index_buffer(&mut self) {
        self.bound.index_buffer = None;
    }

    fn set_uniform_i32(&mut self, program: ResourceHandle, name: &str, value: i32) -> Result<()> {
        // Sampler uniforms only select a texture unit.
        let is_sampler = self
            .programs
            .get(&program)
            .and_then(|p| p.uniforms.get(name))
            .is_some_and(|u| u.kind == UniformKind::Texture);
        if is_sampler {
            return Ok(());
        }
        self.write_uniform(program, name, UniformKind::Int, bytemuck::bytes_of(&value))
    }

    fn set_uniform_vec4(
        &mut self,
        program: ResourceHandle,
        name: &str,
        value: [f32; 4],
    ) -> Result<()> {
        self.write_uniform(program, name, UniformKind::Vec4, bytemuck::cast_slice(&value))
    }

    fn set_uniform_mat4(
        &mut self,
        program: ResourceHandle,
        name: &str,
        value: [[f32; 4]; 4],
    ) -> Result<()> {
        self.write_uniform(program, name, UniformKind::Mat4, bytemuck::cast_slice(&value))
    }

    fn draw_indexed_triangles(&mut self, index_count: u32) -> Result<()> {
        let bound = self.bound;
        let vertex_buffer = bound.vertex_buffer.ok_or(RenderError::NothingBound {
            kind: ResourceKind::VertexBuffer,
        })?;
        let index_buffer = bound.index_buffer.ok_or(RenderError::NothingBound {
            kind: ResourceKind::IndexBuffer,
        })?;
        let layout = bound.layout.ok_or(RenderError::NothingBound {
            kind: ResourceKind::VertexLayout,
        })?;
        let program = bound.program.ok_or(RenderError::NothingBound {
            kind: ResourceKind::ShaderProgram,
        })?;

        self.ensure_pipeline(layout, program, self.state)?;

        let alignment = self.uniform_buffer.alignment();
        let offset = align_to(self.frame_uniforms.len() as u64, alignment) as usize;
        let values = &self
            .programs
            .get(&program)
            .ok_or_else(|| Self::unknown(ResourceKind::ShaderProgram, program))?
            .values;
        self.frame_uniforms.resize(offset, 0);
        self.frame_uniforms.extend_from_slice(values);

        self.draws.push(DrawCommand {
            vertex_buffer,
            index_buffer,
            layout,
            program,
            texture: bound.texture,
            state: self.state,
            uniform_offset: offset as u32,
            index_count,
        });
        Ok(())
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            GpuTexture::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: rgba[0] as f64,
            g: rgba[1] as f64,
            b: rgba[2] as f64,
            a: rgba[3] as f64,
        };
    }

    fn clear(&mut self) {
        self.draws.clear();
        self.frame_uniforms.clear();
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.state.depth_test = enabled;
    }

    fn set_blend(&mut self, enabled: bool) {
        self.state.blend = enabled;
    }

    fn present(&mut self) -> Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring and dropping this frame");
                self.surface.configure(&self.device, &self.config);
                self.clear();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.prepare_uniform_bind_groups();
        self.uniform_buffer.write(&self.queue, &self.frame_uniforms);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for draw in &self.draws {
                let (Some(pipeline), Some(program), Some(vertices), Some(indices)) = (
                    self.pipelines.get(&(draw.layout, draw.program, draw.state)),
                    self.programs.get(&draw.program),
                    self.vertex_buffers.get(&draw.vertex_buffer),
                    self.index_buffers.get(&draw.index_buffer),
                ) else {
                    continue;
                };
                let Some(uniforms) = program.uniform_bind_group.as_ref() else {
                    continue;
                };

                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, uniforms, &[draw.uniform_offset]);
                if program.uniforms.has_texture() {
                    let texture = draw
                        .texture
                        .and_then(|handle| self.textures.get(&handle))
                        .and_then(|bind_group| bind_group.as_ref())
                        .unwrap_or(&self.default_texture);
                    pass.set_bind_group(1, texture, &[]);
                }
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        trace!("Presented {} draws", self.draws.len());
        Ok(())
    }
}
