use crate::math::Vec3;

/// Column-major 4x4 matrix, laid out the way WGSL expects `mat4x4<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub data: [[f32; 4]; 4],
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Self { data }
    }

    /// Leaves every point where it is.
    pub fn identity() -> Self {
        Self {
            data: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn zero() -> Self {
        Self { data: [[0.0; 4]; 4] }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            data: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [translation.x, translation.y, translation.z, 1.0],
            ],
        }
    }

    /// Uniform scale in x and y. Depth is left alone so the clip range stays put.
    pub fn from_scale(scale: f32) -> Self {
        Self {
            data: [
                [scale, 0.0, 0.0, 0.0],
                [0.0, scale, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Applies the matrix to `point`, dividing by `w` when it is non-zero.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let x = self.data[0][0] * point.x
            + self.data[1][0] * point.y
            + self.data[2][0] * point.z
            + self.data[3][0];
        let y = self.data[0][1] * point.x
            + self.data[1][1] * point.y
            + self.data[2][1] * point.z
            + self.data[3][1];
        let z = self.data[0][2] * point.x
            + self.data[1][2] * point.y
            + self.data[2][2] * point.z
            + self.data[3][2];
        let w = self.data[0][3] * point.x
            + self.data[1][3] * point.y
            + self.data[2][3] * point.z
            + self.data[3][3];

        if w != 0.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut result = Self::zero();

        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result.data[i][j] += self.data[k][j] * other.data[i][k];
                }
            }
        }

        result
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(mat: Mat4) -> Self {
        mat.data
    }
}
