use blockfield_common::Vertex;

/// Corners of a unit cube centred on the origin.
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [0.5, -0.5, 0.5],
    [-0.5, -0.5, 0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, -0.5, -0.5],
    [-0.5, -0.5, -0.5],
];

const TEX_CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// One side of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    PosZ,
    NegZ,
    PosX,
    NegX,
    PosY,
    NegY,
}

const fn build_face(corners: [usize; 6], tex: [usize; 6]) -> [Vertex; 6] {
    let mut out = [Vertex::new([0.0; 3], [0.0; 2]); 6];
    let mut i = 0;
    while i < 6 {
        out[i] = Vertex::new(CUBE_CORNERS[corners[i]], TEX_CORNERS[tex[i]]);
        i += 1;
    }
    out
}

// Same order as `Face::ALL`.
const FACE_TEMPLATES: [[Vertex; 6]; 6] = [
    build_face([1, 2, 3, 0, 2, 1], [3, 0, 1, 2, 0, 3]),
    build_face([5, 7, 6, 4, 5, 6], [2, 0, 1, 3, 2, 1]),
    build_face([4, 6, 0, 6, 2, 0], [2, 0, 3, 0, 1, 3]),
    build_face([5, 1, 7, 7, 1, 3], [3, 2, 1, 1, 2, 0]),
    build_face([4, 0, 5, 5, 0, 1], [3, 2, 1, 1, 2, 0]),
    build_face([6, 7, 2, 7, 3, 2], [3, 1, 2, 1, 0, 2]),
];

impl Face {
    /// Emission order within a column.
    pub const ALL: [Face; 6] = [
        Face::PosZ,
        Face::NegZ,
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
    ];

    /// Two triangles at the origin. Seen from outside the cube, each triangle
    /// winds clockwise in right-handed coordinates.
    pub fn template(self) -> &'static [Vertex; 6] {
        &FACE_TEMPLATES[self as usize]
    }

    pub fn normal(self) -> [f32; 3] {
        match self {
            Face::PosZ => [0.0, 0.0, 1.0],
            Face::NegZ => [0.0, 0.0, -1.0],
            Face::PosX => [1.0, 0.0, 0.0],
            Face::NegX => [-1.0, 0.0, 0.0],
            Face::PosY => [0.0, 1.0, 0.0],
            Face::NegY => [0.0, -1.0, 0.0],
        }
    }

    /// Face vertices moved to block `(x, y, z)`.
    pub fn offset(self, x: i32, y: i32, z: i32) -> [Vertex; 6] {
        self.template().map(|v| v.offset(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn vertices_lie_on_face_plane() {
        for face in Face::ALL {
            let n = Vec3::from(face.normal());
            for v in face.template() {
                assert_eq!(Vec3::from(v.position).dot(n), 0.5, "{face:?}");
            }
        }
    }

    #[test]
    fn winding_is_consistent() {
        for face in Face::ALL {
            let n = Vec3::from(face.normal());
            for tri in face.template().chunks(3) {
                let a = Vec3::from(tri[0].position);
                let b = Vec3::from(tri[1].position);
                let c = Vec3::from(tri[2].position);
                let winding = (b - a).cross(c - a).dot(n);
                assert!(winding < 0.0, "{face:?} winds the other way");
            }
        }
    }

    #[test]
    fn each_face_covers_four_corners() {
        for face in Face::ALL {
            let mut corners: Vec<[f32; 3]> = face.template().iter().map(|v| v.position).collect();
            corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
            corners.dedup();
            assert_eq!(corners.len(), 4, "{face:?}");
        }
    }

    #[test]
    fn top_face_texcoords() {
        let uvs: Vec<[f32; 2]> = Face::PosY.template().iter().map(|v| v.texcoord).collect();
        assert_eq!(
            uvs,
            vec![[1.0, 1.0], [0.0, 1.0], [1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]
        );
    }

    #[test]
    fn offset_moves_positions() {
        let moved = Face::NegY.offset(3, 4, 5);
        for (m, t) in moved.iter().zip(Face::NegY.template()) {
            assert_eq!(m.position[0], t.position[0] + 3.0);
            assert_eq!(m.position[1], t.position[1] + 4.0);
            assert_eq!(m.position[2], t.position[2] + 5.0);
        }
    }
}
