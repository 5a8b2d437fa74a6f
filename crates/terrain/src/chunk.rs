use crate::face::Face;
use crate::heightmap::{Heightmap, NoiseHeightmap};
use blockfield_common::Vertex;
use glam::Vec3;

pub const VERTICES_PER_FACE: usize = 6;
pub const VERTICES_PER_COLUMN: usize = VERTICES_PER_FACE * Face::ALL.len();

/// Non-indexed triangle list: every three consecutive vertices form a triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex data as tightly packed bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Axis-aligned bounds of all vertex positions, or `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Build a `size` x `size` chunk over the default noise heightmap.
pub fn build_chunk(size: u32) -> Mesh {
    build_chunk_with(size, &NoiseHeightmap::for_chunk(size))
}

/// Build a `size` x `size` chunk: one block per column at its sampled height,
/// with all six faces emitted whatever the neighbours are.
pub fn build_chunk_with(size: u32, heightmap: &impl Heightmap) -> Mesh {
    let columns = size as usize * size as usize;
    let mut vertices = Vec::with_capacity(columns * VERTICES_PER_COLUMN);

    for x in 0..size {
        for z in 0..size {
            let height = heightmap.height(x, z);
            for face in Face::ALL {
                vertices.extend_from_slice(&face.offset(x as i32, height, z as i32));
            }
        }
    }

    tracing::debug!(size, vertices = vertices.len(), "built terrain chunk");
    Mesh { vertices }
}
