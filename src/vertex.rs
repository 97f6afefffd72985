/// Corner of an image quad. `position` is in world units.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }

    /// Four corners clockwise from the top-left, matching [`QUAD_INDICES`].
    pub fn quad(position: [f32; 2], size: [f32; 2]) -> [Vertex; 4] {
        let [x, y] = position;
        let [w, h] = size;
        [
            Vertex {
                position: [x, y],
                tex_coords: [0.0, 0.0],
            },
            Vertex {
                position: [x + w, y],
                tex_coords: [1.0, 0.0],
            },
            Vertex {
                position: [x + w, y + h],
                tex_coords: [1.0, 1.0],
            },
            Vertex {
                position: [x, y + h],
                tex_coords: [0.0, 1.0],
            },
        ]
    }
}

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];
