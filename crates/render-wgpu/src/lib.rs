//! wgpu implementation of the blockfield GPU backend.
//!
//! The immediate-mode call sequence issued by the renderer is recorded per
//! frame and encoded as a single render pass at present time.
//!
//! # Invariants
//! - Clip depth in [-1, 1] from the camera projection is remapped to [0, 1] in WGSL.
//! - Face culling is disabled.
//! - Shader and pipeline validation errors are reported, never panicked on.

mod gpu;
pub mod shaders;

pub use gpu::WgpuBackend;

pub fn crate_info() -> &'static str {
    "blockfield-render-wgpu v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render-wgpu"));
    }
}
