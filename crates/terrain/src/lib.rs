//! Procedural terrain: heightmaps and the chunk mesh builder.
//!
//! # Invariants
//! - A chunk of size `n` always has `n * n * 36` vertices.
//! - Output is a pure function of size and heightmap.
//! - Faces between neighbouring columns are not culled.

pub mod chunk;
pub mod face;
pub mod heightmap;

pub use chunk::{Mesh, VERTICES_PER_COLUMN, build_chunk, build_chunk_with};
pub use face::Face;
pub use heightmap::{FlatHeightmap, Heightmap, NoiseHeightmap};

pub fn crate_info() -> &'static str {
    "blockfield-terrain v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("terrain"));
    }
}
