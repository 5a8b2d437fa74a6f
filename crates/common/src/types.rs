use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// One corner of a triangle: position followed by texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;
    pub const POSITION_OFFSET: u32 = std::mem::offset_of!(Vertex, position) as u32;
    pub const TEXCOORD_OFFSET: u32 = std::mem::offset_of!(Vertex, texcoord) as u32;

    pub const fn new(position: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self { position, texcoord }
    }

    /// Copy of this vertex moved by a whole-block offset.
    pub fn offset(&self, x: i32, y: i32, z: i32) -> Self {
        Self {
            position: [
                self.position[0] + x as f32,
                self.position[1] + y as f32,
                self.position[2] + z as f32,
            ],
            texcoord: self.texcoord,
        }
    }
}

/// Framebuffer size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Same viewport with both dimensions raised to at least one pixel.
    pub fn non_zero(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout() {
        assert_eq!(Vertex::STRIDE, 20);
        assert_eq!(Vertex::POSITION_OFFSET, 0);
        assert_eq!(Vertex::TEXCOORD_OFFSET, 12);
    }

    #[test]
    fn vertex_offset_keeps_texcoord() {
        let v = Vertex::new([0.5, -0.5, 0.5], [1.0, 0.0]);
        let moved = v.offset(2, 3, -1);
        assert_eq!(moved.position, [2.5, 2.5, -0.5]);
        assert_eq!(moved.texcoord, [1.0, 0.0]);
    }

    #[test]
    fn viewport_non_zero() {
        assert_eq!(Viewport::new(0, 10).non_zero(), Viewport::new(1, 10));
    }
}
