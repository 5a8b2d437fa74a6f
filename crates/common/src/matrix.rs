use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use std::ops::Mul;

/// 4x4 float matrix stored row-major: element `(col, row)` lives at
/// `m[col + row * 4]`.
///
/// Constructors build matrices for column vectors (`M · p`), so translation
/// sits in the last column. Graphics APIs expect column-major data; call
/// [`Matrix4::transpose`] before upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Matrix4(pub [f32; 16]);

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub const ZERO: Self = Self([0.0; 16]);

    /// Rotation of `angle` radians about `axis` (Rodrigues' formula).
    ///
    /// The axis is normalized first, so non-unit axes still produce a pure
    /// rotation. A zero-length axis yields the identity.
    pub fn rotation(angle: f32, axis: Vec3) -> Self {
        let Some(axis) = axis.try_normalize() else {
            return Self::IDENTITY;
        };
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        #[rustfmt::skip]
        let m = Self([
            c + x * x * t,     x * y * t - z * s, x * z * t + y * s, 0.0,
            y * x * t + z * s, c + y * y * t,     y * z * t - x * s, 0.0,
            z * x * t - y * s, z * y * t + x * s, c + z * z * t,     0.0,
            0.0,               0.0,               0.0,               1.0,
        ]);
        m
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        #[rustfmt::skip]
        let m = Self([
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        ]);
        m
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        #[rustfmt::skip]
        let m = Self([
            x,   0.0, 0.0, 0.0,
            0.0, y,   0.0, 0.0,
            0.0, 0.0, z,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        m
    }

    /// Perspective projection with a focal factor shared by both axes.
    ///
    /// `r_xy = min(width, height) / fov` (fov in radians), then
    /// `r_x = r_xy / width` and `r_y = r_xy / height`. Depth maps
    /// `near..far` to clip-space `-1..1`, with `w' = z`.
    pub fn perspective(width: u32, height: u32, fov_degrees: f32, near: f32, far: f32) -> Self {
        let fov = fov_degrees.to_radians();
        let width = width as f32;
        let height = height as f32;

        let r_xy = width.min(height) / fov;
        let r_x = r_xy / width;
        let r_y = r_xy / height;
        let r_zw = 1.0 / (far - near);
        let r_z = (near + far) * r_zw;
        let r_w = -2.0 * near * far * r_zw;

        let mut m = Self::ZERO;
        m.set(0, 0, r_x);
        m.set(1, 1, r_y);
        m.set(2, 2, r_z);
        m.set(2, 3, 1.0);
        m.set(3, 2, r_w);
        m
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.0[col + row * 4]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: f32) {
        self.0[col + row * 4] = value;
    }

    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    /// Matrix product `self · other`.
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = Self::ZERO;
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.get(k, row) * other.get(col, k);
                }
                result.set(col, row, sum);
            }
        }
        result
    }

    /// Applies the matrix to `point` taken as a row vector (`p · M`).
    ///
    /// For a pure rotation this is the inverse rotation.
    pub fn multiply_point(&self, point: Vec4) -> Vec4 {
        let p = point.to_array();
        let mut out = [0.0; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|k| self.get(i, k) * p[k]).sum();
        }
        Vec4::from_array(out)
    }

    /// Transposes in place.
    pub fn transpose(&mut self) {
        let m = &mut self.0;
        m.swap(1, 4);
        m.swap(2, 8);
        m.swap(3, 12);
        m.swap(6, 9);
        m.swap(7, 13);
        m.swap(11, 14);
    }

    pub fn transposed(mut self) -> Self {
        self.transpose();
        self
    }

    pub fn to_glam(&self) -> Mat4 {
        Mat4::from_cols_array(&self.0).transpose()
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl From<Matrix4> for Mat4 {
    fn from(m: Matrix4) -> Mat4 {
        m.to_glam()
    }
}
