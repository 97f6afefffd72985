use crate::canvas::CanvasTransform;
use crate::math::{Mat4, Vec3, ortho};

/// GPU-side copy of the viewport transform, bound at group 0 of the image pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    transform: [[f32; 4]; 4],
}

impl Uniforms {
    pub fn new(canvas_transform: &CanvasTransform, window_size: (f32, f32)) -> Self {
        Self {
            transform: Self::view_matrix(canvas_transform, window_size).into(),
        }
    }

    pub fn update_transform(
        &mut self,
        canvas_transform: &CanvasTransform,
        window_size: (f32, f32),
    ) {
        self.transform = Self::view_matrix(canvas_transform, window_size).into();
    }

    /// `translate(offset) scale(scale)` in screen pixels, then pixels to clip space.
    fn view_matrix(canvas_transform: &CanvasTransform, window_size: (f32, f32)) -> Mat4 {
        let proj = ortho(0.0, window_size.0, window_size.1, 0.0, -1.0, 1.0);

        let translate = Mat4::from_translation(Vec3::new(
            canvas_transform.offset[0],
            canvas_transform.offset[1],
            0.0,
        ));
        let scale = Mat4::from_scale(canvas_transform.scale);

        proj * translate * scale
    }
}
