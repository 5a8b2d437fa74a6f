use crate::backend::{
    AttribLocation, AttribPointer, BufferHandle, GpuBackend, ProgramHandle, ProgramSource,
    TextureHandle, UniformLocation, VertexLayout,
};
use crate::camera::Camera;
use crate::texture::load_texture;
use blockfield_common::{CameraConfig, EngineConfig, TerrainConfig, Vertex, Viewport};
use blockfield_input::InputSource;
use blockfield_terrain::{Mesh, NoiseHeightmap, build_chunk_with};
use std::path::{Path, PathBuf};

/// Names the renderer looks up in the shader program.
pub mod symbols {
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
    pub const TIMER: &str = "timer";
    pub const TEXTURES: [&str; 2] = ["textures[0]", "textures[1]"];
    pub const POSITION: &str = "position";
    pub const TEXCOORD: &str = "texcoord";
}

/// Everything [`Renderer::init`] needs besides the backend and viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub camera: CameraConfig,
    pub terrain: TerrainConfig,
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    pub textures: [PathBuf; 2],
    pub shader: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for RenderSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            camera: config.camera.clone(),
            terrain: config.terrain.clone(),
            clear_color: config.render.clear_color,
            depth_test: config.render.depth_test,
            textures: config.render.textures.clone(),
            shader: config.render.shader.clone(),
        }
    }
}

/// Uniform and attribute handles captured once after linking.
#[derive(Debug, Clone, Copy, Default)]
struct Locations {
    view: Option<UniformLocation>,
    projection: Option<UniformLocation>,
    timer: Option<UniformLocation>,
    samplers: [Option<UniformLocation>; 2],
    position: Option<AttribLocation>,
    texcoord: Option<AttribLocation>,
}

impl Locations {
    fn lookup(backend: &impl GpuBackend, program: ProgramHandle) -> Self {
        let locations = Self {
            view: backend.uniform_location(program, symbols::VIEW),
            projection: backend.uniform_location(program, symbols::PROJECTION),
            timer: backend.uniform_location(program, symbols::TIMER),
            samplers: symbols::TEXTURES.map(|name| backend.uniform_location(program, name)),
            position: backend.attrib_location(program, symbols::POSITION),
            texcoord: backend.attrib_location(program, symbols::TEXCOORD),
        };
        tracing::debug!(?locations, "captured program locations");
        locations
    }

    /// Position and texcoord pointers for [`Vertex`] data.
    fn attrib_pointers(&self) -> impl Iterator<Item = AttribPointer> + use<> {
        let position = self.position.map(|location| AttribPointer {
            location,
            components: 3,
            stride: Vertex::STRIDE,
            offset: Vertex::POSITION_OFFSET,
        });
        let texcoord = self.texcoord.map(|location| AttribPointer {
            location,
            components: 2,
            stride: Vertex::STRIDE,
            offset: Vertex::TEXCOORD_OFFSET,
        });
        position.into_iter().chain(texcoord)
    }
}

#[derive(Debug, Clone, Copy)]
struct GpuMesh {
    buffer: BufferHandle,
    vertex_count: u32,
}

/// Owns the camera, the terrain mesh and every GPU resource, and draws one
/// frame per [`Renderer::tick`].
///
/// Holding a `Renderer` means initialization has happened; there is no way
/// back to the uninitialized state other than [`Renderer::shutdown`].
pub struct Renderer<B: GpuBackend> {
    backend: B,
    camera: Camera,
    program: Option<ProgramHandle>,
    locations: Locations,
    textures: [Option<TextureHandle>; 2],
    meshes: Vec<GpuMesh>,
    frames: u64,
}

impl<B: GpuBackend> Renderer<B> {
    /// Set up GPU state, textures, program and the terrain chunk.
    ///
    /// Texture and shader failures are logged and leave the matching slot
    /// empty; rendering still proceeds.
    pub fn init(mut backend: B, viewport: Viewport, settings: &RenderSettings) -> Self {
        let camera = Camera::with_config(viewport, &settings.camera);

        backend.set_viewport(viewport.non_zero());
        backend.set_clear_color(settings.clear_color);
        backend.set_depth_test(settings.depth_test);

        let textures = [
            upload_texture(&mut backend, &settings.textures[0]),
            upload_texture(&mut backend, &settings.textures[1]),
        ];
        let program = compile_program(&mut backend, settings.shader.as_deref());

        let heightmap = NoiseHeightmap::from_config(&settings.terrain);
        let chunk = build_chunk_with(settings.terrain.chunk_size, &heightmap);
        let meshes = upload_mesh(&mut backend, &chunk).into_iter().collect();

        let locations = program
            .map(|p| Locations::lookup(&backend, p))
            .unwrap_or_default();

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            textures = textures.iter().flatten().count(),
            program = program.is_some(),
            vertices = chunk.vertex_count(),
            "renderer initialized"
        );

        Self {
            backend,
            camera,
            program,
            locations,
            textures,
            meshes,
            frames: 0,
        }
    }

    /// Advance the camera and draw one frame. `elapsed` is seconds since start.
    pub fn tick(&mut self, input: &impl InputSource, elapsed: f32) {
        self.camera.tick(input);

        self.backend.clear();

        if let Some(program) = self.program {
            self.draw(program, elapsed);
        }

        if let Err(e) = self.backend.present() {
            tracing::warn!("present failed: {e}");
        }
        self.frames += 1;
    }

    fn draw(&mut self, program: ProgramHandle, elapsed: f32) {
        let backend = &mut self.backend;
        let loc = self.locations;

        backend.use_program(Some(program));
        if let Some(l) = loc.view {
            backend.set_uniform_mat4(l, self.camera.view_matrix());
        }
        if let Some(l) = loc.projection {
            backend.set_uniform_mat4(l, self.camera.projection_matrix());
        }
        if let Some(l) = loc.timer {
            backend.set_uniform_f32(l, elapsed);
        }

        for (unit, (texture, sampler)) in self.textures.iter().zip(loc.samplers).enumerate() {
            backend.bind_texture(unit as u32, *texture);
            if let Some(l) = sampler {
                backend.set_uniform_i32(l, unit as i32);
            }
        }

        for mesh in &self.meshes {
            backend.bind_vertex_buffer(mesh.buffer);
            for pointer in loc.attrib_pointers() {
                backend.vertex_attrib_pointer(pointer);
                backend.enable_attrib(pointer.location);
            }
            backend.draw_arrays(0, mesh.vertex_count);
        }

        for pointer in loc.attrib_pointers() {
            backend.disable_attrib(pointer.location);
        }
        backend.use_program(None);
    }

    /// Take the host's current cursor as the camera's reference point, so a
    /// cursor that moved before the first tick does not turn the camera.
    pub fn sync_input(&mut self, input: &impl InputSource) {
        self.camera.sync_mouse(input.mouse_position());
    }

    /// Apply a new window size. Call before the next [`Renderer::tick`].
    pub fn on_resize(&mut self, viewport: Viewport) {
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.backend.set_viewport(viewport.non_zero());
        self.camera.update_projection(viewport);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    pub fn loaded_textures(&self) -> usize {
        self.textures.iter().flatten().count()
    }

    pub fn vertex_count(&self) -> u32 {
        self.meshes.iter().map(|m| m.vertex_count).sum()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Release GPU resources in reverse creation order and return the backend.
    pub fn shutdown(mut self) -> B {
        for mesh in self.meshes.drain(..).rev() {
            self.backend.delete_buffer(mesh.buffer);
        }
        if let Some(program) = self.program.take() {
            self.backend.delete_program(program);
        }
        for texture in self.textures.iter_mut().rev().filter_map(Option::take) {
            self.backend.delete_texture(texture);
        }
        tracing::info!(frames = self.frames, "renderer shut down");
        self.backend
    }
}

fn upload_texture(backend: &mut impl GpuBackend, path: &Path) -> Option<TextureHandle> {
    let image = match load_texture(path) {
        Ok(image) => image.into_bottom_up(),
        Err(e) => {
            tracing::error!("{e}");
            return None;
        }
    };
    match backend.create_texture(&image) {
        Ok(texture) => Some(texture),
        Err(e) => {
            tracing::error!(path = %path.display(), "{e}");
            None
        }
    }
}

fn compile_program(backend: &mut impl GpuBackend, shader: Option<&Path>) -> Option<ProgramHandle> {
    let source = match shader {
        Some(path) => match ProgramSource::from_file(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("{e}");
                return None;
            }
        },
        None => backend.builtin_program(),
    };
    match backend.create_program(&source) {
        Ok(program) => Some(program),
        Err(e) => {
            tracing::error!("{e}");
            None
        }
    }
}

fn vertex_layout(vertex_count: usize) -> Option<VertexLayout> {
    match u32::try_from(vertex_count) {
        Ok(count) => Some(VertexLayout {
            count,
            stride: Vertex::STRIDE,
        }),
        Err(_) => {
            tracing::error!(vertices = vertex_count, "mesh too large for one vertex buffer");
            None
        }
    }
}

fn upload_mesh(backend: &mut impl GpuBackend, mesh: &Mesh) -> Option<GpuMesh> {
    let layout = vertex_layout(mesh.vertex_count())?;
    match backend.create_vertex_buffer(mesh.as_bytes(), layout) {
        Ok(buffer) => Some(GpuMesh {
            buffer,
            vertex_count: layout.count,
        }),
        Err(e) => {
            tracing::error!("{e}");
            None
        }
    }
}
