use crate::texture::TextureImage;
use blockfield_common::{Matrix4, Viewport};
use std::path::{Path, PathBuf};

/// Errors reported by a GPU backend. None of them abort rendering.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to read shader {path}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader program {label} failed to compile: {message}")]
    ShaderCompile { label: String, message: String },
    #[error("texture creation failed: {0}")]
    Texture(String),
    #[error("vertex buffer creation failed: {0}")]
    Buffer(String),
    #[error("no compatible GPU adapter: {0}")]
    Adapter(String),
    #[error("failed to request GPU device: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

/// Program-specific handle for a named uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniformLocation(pub u32);

/// Program-specific handle for a named vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttribLocation(pub u32);

/// Shape of the bytes handed to [`GpuBackend::create_vertex_buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub count: u32,
    pub stride: u32,
}

impl VertexLayout {
    pub fn byte_len(&self) -> usize {
        self.count as usize * self.stride as usize
    }
}

/// Where one float attribute lives inside the bound vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttribPointer {
    pub location: AttribLocation,
    pub components: u32,
    pub stride: u32,
    pub offset: u32,
}

/// Shader program text. A single module holds both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    pub label: String,
    pub code: String,
}

impl ProgramSource {
    pub fn new(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path).map_err(|source| BackendError::ShaderSource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), code))
    }
}

/// Immediate-mode GPU context: state setters, resource creation, and the
/// bind/draw calls of a frame.
///
/// Binding a location that does not exist is expressed by the caller skipping
/// the call; lookups return `None` for unknown names.
pub trait GpuBackend {
    /// Program used when no shader file is configured.
    fn builtin_program(&self) -> ProgramSource;

    fn set_clear_color(&mut self, color: [f32; 4]);
    fn set_depth_test(&mut self, enabled: bool);
    fn set_viewport(&mut self, viewport: Viewport);

    fn create_vertex_buffer(
        &mut self,
        data: &[u8],
        layout: VertexLayout,
    ) -> Result<BufferHandle, BackendError>;

    /// Upload RGBA8 pixels, first row at texture coordinate `v = 0`.
    fn create_texture(&mut self, image: &TextureImage) -> Result<TextureHandle, BackendError>;

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramHandle, BackendError>;

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation>;

    /// Clear colour and depth for a new frame.
    fn clear(&mut self);
    fn use_program(&mut self, program: Option<ProgramHandle>);
    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Matrix4);
    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32);
    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32);
    /// Bind a texture to a texture unit; `None` leaves the unit empty.
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>);
    fn bind_vertex_buffer(&mut self, buffer: BufferHandle);
    fn vertex_attrib_pointer(&mut self, pointer: AttribPointer);
    fn enable_attrib(&mut self, location: AttribLocation);
    fn disable_attrib(&mut self, location: AttribLocation);
    /// Non-indexed triangle list over the bound vertex buffer.
    fn draw_arrays(&mut self, first: u32, count: u32);
    /// Finish the frame and show it.
    fn present(&mut self) -> Result<(), BackendError>;

    fn delete_buffer(&mut self, buffer: BufferHandle);
    fn delete_texture(&mut self, texture: TextureHandle);
    fn delete_program(&mut self, program: ProgramHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_byte_len() {
        let layout = VertexLayout {
            count: 36,
            stride: 20,
        };
        assert_eq!(layout.byte_len(), 720);
    }

    #[test]
    fn program_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.wgsl");
        std::fs::write(&path, "// shader").unwrap();
        let source = ProgramSource::from_file(&path).unwrap();
        assert_eq!(source.code, "// shader");
        assert!(source.label.ends_with("terrain.wgsl"));
    }

    #[test]
    fn missing_program_file() {
        let err = ProgramSource::from_file("missing/terrain.wgsl").unwrap_err();
        assert!(matches!(err, BackendError::ShaderSource { .. }));
    }
}
