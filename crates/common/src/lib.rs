//! Shared building blocks for the blockfield renderer.
//!
//! - [`Matrix4`]: row-major 4x4 transform algebra used by the camera.
//! - [`Vertex`] and [`Viewport`]: plain data shared by the mesh builder and renderer.
//! - [`EngineConfig`]: YAML-backed configuration for every crate.

pub mod config;
pub mod matrix;
pub mod types;

pub use config::{CameraConfig, ConfigError, EngineConfig, RenderConfig, TerrainConfig, WindowConfig};
pub use matrix::Matrix4;
pub use types::{Vertex, Viewport};

pub fn crate_info() -> &'static str {
    "blockfield-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
