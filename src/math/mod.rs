mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;

/// Orthographic projection mapping `left..right` and `top..bottom` onto clip space.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let w = right - left;
    let h = top - bottom;
    let d = far - near;

    Mat4::new([
        [2.0 / w, 0.0, 0.0, 0.0],
        [0.0, 2.0 / h, 0.0, 0.0],
        [0.0, 0.0, -2.0 / d, 0.0],
        [-(right + left) / w, -(top + bottom) / h, -(far + near) / d, 1.0],
    ])
}
