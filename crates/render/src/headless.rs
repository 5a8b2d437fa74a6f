use crate::backend::{
    AttribLocation, AttribPointer, BackendError, BufferHandle, GpuBackend, ProgramHandle,
    ProgramSource, TextureHandle, UniformLocation, VertexLayout,
};
use crate::renderer::symbols;
use crate::texture::TextureImage;
use blockfield_common::{Matrix4, Viewport};
use std::collections::BTreeMap;
use std::fmt;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    SetClearColor([f32; 4]),
    SetDepthTest(bool),
    SetViewport(Viewport),
    CreateBuffer {
        buffer: BufferHandle,
        layout: VertexLayout,
    },
    CreateTexture {
        texture: TextureHandle,
        width: u32,
        height: u32,
    },
    CreateProgram {
        program: ProgramHandle,
        label: String,
    },
    Clear,
    UseProgram(Option<ProgramHandle>),
    UniformMat4 {
        location: UniformLocation,
        value: Matrix4,
    },
    UniformF32 {
        location: UniformLocation,
        value: f32,
    },
    UniformI32 {
        location: UniformLocation,
        value: i32,
    },
    BindTexture {
        unit: u32,
        texture: Option<TextureHandle>,
    },
    BindVertexBuffer(BufferHandle),
    AttribPointer(AttribPointer),
    EnableAttrib(AttribLocation),
    DisableAttrib(AttribLocation),
    DrawArrays {
        first: u32,
        count: u32,
    },
    Present,
    DeleteBuffer(BufferHandle),
    DeleteTexture(TextureHandle),
    DeleteProgram(ProgramHandle),
}

impl fmt::Display for GpuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuCommand::SetClearColor(c) => {
                write!(f, "clear_color({:.2}, {:.2}, {:.2}, {:.2})", c[0], c[1], c[2], c[3])
            }
            GpuCommand::SetDepthTest(on) => write!(f, "depth_test({on})"),
            GpuCommand::SetViewport(v) => write!(f, "viewport({}x{})", v.width, v.height),
            GpuCommand::CreateBuffer { buffer, layout } => write!(
                f,
                "create_buffer(#{}, {} vertices, stride {})",
                buffer.0, layout.count, layout.stride
            ),
            GpuCommand::CreateTexture {
                texture,
                width,
                height,
            } => write!(f, "create_texture(#{}, {width}x{height})", texture.0),
            GpuCommand::CreateProgram { program, label } => {
                write!(f, "create_program(#{}, {label})", program.0)
            }
            GpuCommand::Clear => write!(f, "clear"),
            GpuCommand::UseProgram(Some(p)) => write!(f, "use_program(#{})", p.0),
            GpuCommand::UseProgram(None) => write!(f, "use_program(none)"),
            GpuCommand::UniformMat4 { location, .. } => write!(f, "uniform_mat4(@{})", location.0),
            GpuCommand::UniformF32 { location, value } => {
                write!(f, "uniform_f32(@{}, {value:.3})", location.0)
            }
            GpuCommand::UniformI32 { location, value } => {
                write!(f, "uniform_i32(@{}, {value})", location.0)
            }
            GpuCommand::BindTexture {
                unit,
                texture: Some(t),
            } => write!(f, "bind_texture(unit {unit}, #{})", t.0),
            GpuCommand::BindTexture {
                unit,
                texture: None,
            } => write!(f, "bind_texture(unit {unit}, none)"),
            GpuCommand::BindVertexBuffer(b) => write!(f, "bind_vertex_buffer(#{})", b.0),
            GpuCommand::AttribPointer(p) => write!(
                f,
                "attrib_pointer(@{}, {} floats, stride {}, offset {})",
                p.location.0, p.components, p.stride, p.offset
            ),
            GpuCommand::EnableAttrib(a) => write!(f, "enable_attrib(@{})", a.0),
            GpuCommand::DisableAttrib(a) => write!(f, "disable_attrib(@{})", a.0),
            GpuCommand::DrawArrays { first, count } => {
                write!(f, "draw_arrays({first}, {count})")
            }
            GpuCommand::Present => write!(f, "present"),
            GpuCommand::DeleteBuffer(b) => write!(f, "delete_buffer(#{})", b.0),
            GpuCommand::DeleteTexture(t) => write!(f, "delete_texture(#{})", t.0),
            GpuCommand::DeleteProgram(p) => write!(f, "delete_program(#{})", p.0),
        }
    }
}

/// Backend without a GPU. Records every call so frame sequencing can be
/// inspected by tests and the CLI.
#[derive(Debug)]
pub struct HeadlessBackend {
    commands: Vec<GpuCommand>,
    uniforms: Vec<String>,
    attribs: Vec<String>,
    buffers: BTreeMap<BufferHandle, Vec<u8>>,
    textures: BTreeMap<TextureHandle, TextureImage>,
    programs: Vec<ProgramHandle>,
    next_handle: u32,
    fail_programs: bool,
    frames_presented: u64,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// Backend whose programs expose the built-in uniform and attribute names.
    pub fn new() -> Self {
        let mut uniforms: Vec<String> = vec![
            symbols::VIEW.into(),
            symbols::PROJECTION.into(),
            symbols::TIMER.into(),
        ];
        uniforms.extend(symbols::TEXTURES.iter().map(|s| s.to_string()));
        Self::with_symbols(
            uniforms,
            vec![symbols::POSITION.into(), symbols::TEXCOORD.into()],
        )
    }

    /// Backend whose programs expose exactly the given names.
    pub fn with_symbols(uniforms: Vec<String>, attribs: Vec<String>) -> Self {
        Self {
            commands: Vec::new(),
            uniforms,
            attribs,
            buffers: BTreeMap::new(),
            textures: BTreeMap::new(),
            programs: Vec::new(),
            next_handle: 1,
            fail_programs: false,
            frames_presented: 0,
        }
    }

    /// Make every program compilation fail.
    pub fn failing_programs(mut self) -> Self {
        self.fail_programs = true;
        self
    }

    pub fn commands(&self) -> &[GpuCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<GpuCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    pub fn texture(&self, texture: TextureHandle) -> Option<&TextureImage> {
        self.textures.get(&texture)
    }

    /// Live buffers, textures and programs.
    pub fn live_resources(&self) -> usize {
        self.buffers.len() + self.textures.len() + self.programs.len()
    }

    /// Human-readable command log, one call per line.
    pub fn log(&self) -> String {
        let mut out = String::new();
        for cmd in &self.commands {
            out.push_str(&cmd.to_string());
            out.push('\n');
        }
        out
    }

    fn next(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn record(&mut self, cmd: GpuCommand) {
        self.commands.push(cmd);
    }
}

impl GpuBackend for HeadlessBackend {
    fn builtin_program(&self) -> ProgramSource {
        ProgramSource::new("headless", "")
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.record(GpuCommand::SetClearColor(color));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.record(GpuCommand::SetDepthTest(enabled));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.record(GpuCommand::SetViewport(viewport));
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
        let buffer = BufferHandle(self.next());
        self.buffers.insert(buffer, data.to_vec());
        self.record(GpuCommand::CreateBuffer { buffer, layout });
        Ok(buffer)
    }

    fn create_texture(&mut self, image: &TextureImage) -> Result<TextureHandle, BackendError> {
        let texture = TextureHandle(self.next());
        self.textures.insert(texture, image.clone());
        self.record(GpuCommand::CreateTexture {
            texture,
            width: image.width(),
            height: image.height(),
        });
        Ok(texture)
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramHandle, BackendError> {
        if self.fail_programs {
            return Err(BackendError::ShaderCompile {
                label: source.label.clone(),
                message: "compilation disabled".into(),
            });
        }
        let program = ProgramHandle(self.next());
        self.programs.push(program);
        self.record(GpuCommand::CreateProgram {
            program,
            label: source.label.clone(),
        });
        Ok(program)
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        if !self.programs.contains(&program) {
            return None;
        }
        let index = self.uniforms.iter().position(|u| u == name)?;
        Some(UniformLocation(index as u32))
    }

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation> {
        if !self.programs.contains(&program) {
            return None;
        }
        let index = self.attribs.iter().position(|a| a == name)?;
        Some(AttribLocation(index as u32))
    }

    fn clear(&mut self) {
        self.record(GpuCommand::Clear);
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.record(GpuCommand::UseProgram(program));
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Matrix4) {
        self.record(GpuCommand::UniformMat4 {
            location,
            value: *value,
        });
    }

    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32) {
        self.record(GpuCommand::UniformF32 { location, value });
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.record(GpuCommand::UniformI32 { location, value });
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        self.record(GpuCommand::BindTexture { unit, texture });
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) {
        self.record(GpuCommand::BindVertexBuffer(buffer));
    }

    fn vertex_attrib_pointer(&mut self, pointer: AttribPointer) {
        self.record(GpuCommand::AttribPointer(pointer));
    }

    fn enable_attrib(&mut self, location: AttribLocation) {
        self.record(GpuCommand::EnableAttrib(location));
    }

    fn disable_attrib(&mut self, location: AttribLocation) {
        self.record(GpuCommand::DisableAttrib(location));
    }

    fn draw_arrays(&mut self, first: u32, count: u32) {
        self.record(GpuCommand::DrawArrays { first, count });
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.frames_presented += 1;
        self.record(GpuCommand::Present);
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer);
        self.record(GpuCommand::DeleteBuffer(buffer));
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture);
        self.record(GpuCommand::DeleteTexture(texture));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.retain(|p| *p != program);
        self.record(GpuCommand::DeleteProgram(program));
    }
}
