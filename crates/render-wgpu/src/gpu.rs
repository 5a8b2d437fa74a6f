use crate::shaders::{self, SAMPLER_SLOTS, UNIFORMS, UniformSlot};
use blockfield_common::{Matrix4, Viewport};
use blockfield_render::{
    AttribLocation, AttribPointer, BackendError, BufferHandle, GpuBackend, ProgramHandle,
    ProgramSource, TextureHandle, TextureImage, UniformLocation, VertexLayout,
};
use bytemuck::{Pod, Zeroable};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const TEXTURE_UNITS: usize = 2;

/// Uniform block matching `Frame` in the WGSL programs.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view: [f32; 16],
    projection: [f32; 16],
    timer: f32,
    _pad: [f32; 3],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: Matrix4::IDENTITY.0,
            projection: Matrix4::IDENTITY.0,
            timer: 0.0,
            _pad: [0.0; 3],
        }
    }
}

struct Program {
    label: String,
    module: wgpu::ShaderModule,
    uniforms: Vec<UniformSlot>,
    attribs: Vec<u32>,
}

struct GpuBuffer {
    buffer: wgpu::Buffer,
    layout: VertexLayout,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramHandle,
    stride: u32,
    attribs: Vec<AttribPointer>,
    depth_test: bool,
}

struct DrawCall {
    key: PipelineKey,
    buffer: BufferHandle,
    first: u32,
    count: u32,
}

/// Per-frame state between `clear` and `present`.
#[derive(Default)]
struct FrameState {
    clear: bool,
    program: Option<ProgramHandle>,
    uniforms: FrameUniforms,
    sampler_units: [u32; SAMPLER_SLOTS],
    texture_units: [Option<TextureHandle>; TEXTURE_UNITS],
    vertex_buffer: Option<BufferHandle>,
    pointers: BTreeMap<AttribLocation, AttribPointer>,
    enabled: BTreeSet<AttribLocation>,
    draws: Vec<DrawCall>,
}

impl FrameState {
    fn new() -> Self {
        Self {
            sampler_units: [0, 1],
            ..Self::default()
        }
    }
}

/// [`GpuBackend`] on top of wgpu.
///
/// Calls are recorded until [`GpuBackend::present`], which encodes one render
/// pass with one pipeline per program, vertex layout, and depth mode.
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    adapter_info: wgpu::AdapterInfo,
    depth_view: wgpu::TextureView,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    fallback: GpuTexture,
    clear_color: wgpu::Color,
    depth_test: bool,
    buffers: HashMap<BufferHandle, GpuBuffer>,
    textures: HashMap<TextureHandle, GpuTexture>,
    programs: HashMap<ProgramHandle, Program>,
    pipelines: HashMap<PipelineKey, Option<wgpu::RenderPipeline>>,
    frame: FrameState,
    next_handle: u32,
}

impl WgpuBackend {
    /// Acquire an adapter and device for `target` and configure its surface.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
        vsync: bool,
    ) -> Result<Self, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| BackendError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| BackendError::Adapter("no adapter supports the window surface".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("blockfield_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| BackendError::Device(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|e: wgpu::Error| tracing::error!("wgpu: {e}")));

        let viewport = viewport.non_zero();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or_else(|| BackendError::Surface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: viewport.width,
            height: viewport.height,
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frame_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let fallback = upload_rgba(&device, &queue, "fallback_texture", &TextureImage::solid([0; 4]));
        let depth_view = create_depth_view(&device, viewport);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            adapter_info: adapter.get_info(),
            depth_view,
            bind_group_layout,
            pipeline_layout,
            uniform_buffer,
            sampler,
            fallback,
            clear_color: wgpu::Color::TRANSPARENT,
            depth_test: false,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            programs: HashMap::new(),
            pipelines: HashMap::new(),
            frame: FrameState::new(),
            next_handle: 1,
        })
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    fn next(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn ensure_pipeline(&mut self, key: &PipelineKey) {
        if self.pipelines.contains_key(key) {
            return;
        }
        let pipeline = self.build_pipeline(key);
        self.pipelines.insert(key.clone(), pipeline);
    }

    fn build_pipeline(&self, key: &PipelineKey) -> Option<wgpu::RenderPipeline> {
        let program = self.programs.get(&key.program)?;

        let mut attributes = Vec::with_capacity(key.attribs.len());
        for pointer in &key.attribs {
            let Some(format) = vertex_format(pointer.components) else {
                tracing::warn!(
                    location = pointer.location.0,
                    components = pointer.components,
                    "unsupported attribute width"
                );
                return None;
            };
            attributes.push(wgpu::VertexAttribute {
                format,
                offset: pointer.offset as u64,
                shader_location: pointer.location.0,
            });
        }

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label.as_str()),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.module,
                entry_point: Some(shaders::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: key.stride as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.module,
                entry_point: Some(shaders::FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: key.depth_test,
                depth_compare: if key.depth_test {
                    wgpu::CompareFunction::Less
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            tracing::error!(program = %program.label, "pipeline creation failed: {err}");
            return None;
        }
        tracing::debug!(program = %program.label, stride = key.stride, "built pipeline");
        Some(pipeline)
    }

    fn bind_group(&self) -> wgpu::BindGroup {
        let views: [&wgpu::TextureView; SAMPLER_SLOTS] = std::array::from_fn(|slot| {
            let unit = self.frame.sampler_units[slot] as usize;
            self.frame
                .texture_units
                .get(unit)
                .copied()
                .flatten()
                .and_then(|t| self.textures.get(&t))
                .map_or(&self.fallback.view, |t| &t.view)
        });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(views[0]),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(views[1]),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn program_slot(&self, location: UniformLocation) -> Option<UniformSlot> {
        let program = self.programs.get(&self.frame.program?)?;
        let (_, slot) = UNIFORMS.get(location.0 as usize)?;
        program.uniforms.contains(slot).then_some(*slot)
    }

    fn encode(&self, target: &wgpu::TextureView, draws: &[DrawCall]) -> wgpu::CommandBuffer {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        let bind_group = self.bind_group();
        let (color_load, depth_load) = if self.frame.clear {
            (wgpu::LoadOp::Clear(self.clear_color), wgpu::LoadOp::Clear(1.0))
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &bind_group, &[]);
            for draw in draws {
                let Some(Some(pipeline)) = self.pipelines.get(&draw.key) else {
                    continue;
                };
                let Some(buffer) = self.buffers.get(&draw.buffer) else {
                    continue;
                };
                let end = draw.first.saturating_add(draw.count);
                if end > buffer.layout.count {
                    tracing::warn!(
                        end,
                        available = buffer.layout.count,
                        "draw exceeds vertex buffer"
                    );
                    continue;
                }
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, buffer.buffer.slice(..));
                pass.draw(draw.first..end, 0..1);
            }
        }

        encoder.finish()
    }
}

impl GpuBackend for WgpuBackend {
    fn builtin_program(&self) -> ProgramSource {
        ProgramSource::new("builtin terrain", shaders::TERRAIN_SHADER)
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color.map(f64::from);
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        let viewport = viewport.non_zero();
        if viewport == self.viewport() {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, viewport);
    }

    fn create_vertex_buffer(
        &mut self,
        data: &[u8],
        layout: VertexLayout,
    ) -> Result<BufferHandle, BackendError> {
        if data.len() != layout.byte_len() {
            return Err(BackendError::Buffer(format!(
                "{} bytes given for {} vertices of stride {}",
                data.len(),
                layout.count,
                layout.stride
            )));
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer"),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX,
            });
        let handle = BufferHandle(self.next());
        self.buffers.insert(handle, GpuBuffer { buffer, layout });
        Ok(handle)
    }

    fn create_texture(&mut self, image: &TextureImage) -> Result<TextureHandle, BackendError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width() == 0 || image.height() == 0 || image.width() > max || image.height() > max
        {
            return Err(BackendError::Texture(format!(
                "{}x{} is outside 1..={max}",
                image.width(),
                image.height()
            )));
        }
        let texture = upload_rgba(&self.device, &self.queue, "texture", image);
        let handle = TextureHandle(self.next());
        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramHandle, BackendError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(source.label.as_str()),
                source: wgpu::ShaderSource::Wgsl(source.code.as_str().into()),
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(BackendError::ShaderCompile {
                label: source.label.clone(),
                message: err.to_string(),
            });
        }

        let uniforms = UNIFORMS
            .iter()
            .map(|(_, slot)| *slot)
            .filter(|slot| shaders::mentions(&source.code, slot.identifier()))
            .collect();
        let attribs = shaders::ATTRIBUTES
            .iter()
            .filter(|(name, _)| shaders::mentions(&source.code, name))
            .map(|(_, location)| *location)
            .collect();

        let handle = ProgramHandle(self.next());
        tracing::debug!(label = %source.label, handle = handle.0, "compiled program");
        self.programs.insert(
            handle,
            Program {
                label: source.label.clone(),
                module,
                uniforms,
                attribs,
            },
        );
        Ok(handle)
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let program = self.programs.get(&program)?;
        let index = shaders::uniform_index(name)?;
        program
            .uniforms
            .contains(&UNIFORMS[index].1)
            .then_some(UniformLocation(index as u32))
    }

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation> {
        let program = self.programs.get(&program)?;
        let location = shaders::attribute_location(name)?;
        program
            .attribs
            .contains(&location)
            .then_some(AttribLocation(location))
    }

    fn clear(&mut self) {
        self.frame.clear = true;
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.frame.program = program.filter(|p| self.programs.contains_key(p));
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Matrix4) {
        match self.program_slot(location) {
            Some(UniformSlot::View) => self.frame.uniforms.view = value.0,
            Some(UniformSlot::Projection) => self.frame.uniforms.projection = value.0,
            slot => tracing::warn!(?slot, "mat4 written to non-matrix uniform"),
        }
    }

    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32) {
        match self.program_slot(location) {
            Some(UniformSlot::Timer) => self.frame.uniforms.timer = value,
            slot => tracing::warn!(?slot, "f32 written to non-float uniform"),
        }
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) {
        match self.program_slot(location) {
            Some(UniformSlot::Sampler(slot)) if (0..TEXTURE_UNITS as i32).contains(&value) => {
                self.frame.sampler_units[slot] = value as u32;
            }
            slot => tracing::warn!(?slot, value, "invalid sampler assignment"),
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        match self.frame.texture_units.get_mut(unit as usize) {
            Some(bound) => *bound = texture,
            None => tracing::warn!(unit, "texture unit out of range"),
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) {
        self.frame.vertex_buffer = Some(buffer);
    }

    fn vertex_attrib_pointer(&mut self, pointer: AttribPointer) {
        self.frame.pointers.insert(pointer.location, pointer);
    }

    fn enable_attrib(&mut self, location: AttribLocation) {
        self.frame.enabled.insert(location);
    }

    fn disable_attrib(&mut self, location: AttribLocation) {
        self.frame.enabled.remove(&location);
    }

    fn draw_arrays(&mut self, first: u32, count: u32) {
        let (Some(program), Some(buffer)) = (self.frame.program, self.frame.vertex_buffer) else {
            tracing::debug!("draw without program or vertex buffer ignored");
            return;
        };
        let attribs: Vec<AttribPointer> = self
            .frame
            .enabled
            .iter()
            .filter_map(|location| self.frame.pointers.get(location).copied())
            .collect();
        let stride = attribs
            .first()
            .map(|p| p.stride)
            .or_else(|| self.buffers.get(&buffer).map(|b| b.layout.stride))
            .unwrap_or(0);
        self.frame.draws.push(DrawCall {
            key: PipelineKey {
                program,
                stride,
                attribs,
                depth_test: self.depth_test,
            },
            buffer,
            first,
            count,
        });
    }

    fn present(&mut self) -> Result<(), BackendError> {
        let draws = std::mem::take(&mut self.frame.draws);
        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.frame = FrameState::new();
                self.surface.configure(&self.device, &self.config);
                return Err(BackendError::Surface("surface lost, reconfigured".into()));
            }
            Err(e) => {
                self.frame = FrameState::new();
                return Err(BackendError::Surface(e.to_string()));
            }
        };

        for draw in &draws {
            self.ensure_pipeline(&draw.key);
        }
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.frame.uniforms),
        );

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let commands = self.encode(&view, &draws);
        self.queue.submit(std::iter::once(commands));
        output.present();

        self.frame = FrameState::new();
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(gpu) = self.buffers.remove(&buffer) {
            gpu.buffer.destroy();
        }
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture);
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.remove(&program);
        self.pipelines.retain(|key, _| key.program != program);
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn vertex_format(components: u32) -> Option<wgpu::VertexFormat> {
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

/// Upload rows as given; the first row lands at `v = 0`.
fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &TextureImage,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.pixels(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.row_bytes() as u32),
            rows_per_image: Some(image.height()),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        _texture: texture,
        view,
    }
}

fn create_depth_view(device: &wgpu::Device, viewport: Viewport) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
