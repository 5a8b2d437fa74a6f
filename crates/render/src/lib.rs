//! Frame rendering: camera, GPU backend seam, and the per-frame driver.
//!
//! # Invariants
//! - [`Renderer`] talks to the GPU only through [`GpuBackend`].
//! - Each tick issues exactly one clear and one present, with or without a program.
//! - Missing textures, shaders, or shader symbols are logged, never fatal.
//!
//! [`HeadlessBackend`] records every call instead of drawing; the wgpu
//! implementation lives in `blockfield-render-wgpu`.

pub mod backend;
pub mod camera;
pub mod headless;
pub mod renderer;
pub mod texture;

pub use backend::{
    AttribLocation, AttribPointer, BackendError, BufferHandle, GpuBackend, ProgramHandle,
    ProgramSource, TextureHandle, UniformLocation, VertexLayout,
};
pub use camera::Camera;
pub use headless::{GpuCommand, HeadlessBackend};
pub use renderer::{RenderSettings, Renderer, symbols};
pub use texture::{RowOrder, TextureError, TextureImage, load_texture};

pub fn crate_info() -> &'static str {
    "blockfield-render v0.1.0"
}
