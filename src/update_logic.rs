use crate::app_state::State;
use crate::texture::ImageTexture;
use crate::vertex::{QUAD_INDICES, Vertex};
use wgpu::util::DeviceExt;

impl State {
    pub fn update(&mut self) {
        let generation = self.scene.images.generation();
        if self.image_buffers.generation == Some(generation) {
            return;
        }
        self.image_buffers.generation = Some(generation);
        self.update_image_buffers();
    }

    fn update_image_buffers(&mut self) {
        let images = self.scene.images.images();

        self.image_buffers
            .textures
            .retain(|id, _| images.iter().any(|img| img.id == *id));

        let mut vertices = Vec::with_capacity(images.len() * 4);
        let mut indices = Vec::with_capacity(images.len() * 6);
        let mut draws = Vec::with_capacity(images.len());

        for image in images {
            if !self.image_buffers.textures.contains_key(&image.id) {
                let label = format!("image {}", image.id);
                let texture = ImageTexture::from_rgba(
                    &self.gpu.device,
                    &self.gpu.queue,
                    &self.gpu.texture_layout,
                    &self.gpu.sampler,
                    &image.pixels,
                    &label,
                );
                self.image_buffers.textures.insert(image.id, texture);
            }

            let base = vertices.len() as u32;
            vertices.extend_from_slice(&Vertex::quad(image.position, image.size));
            indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            draws.push(image.id);
        }

        self.image_buffers.draws = draws;
        if vertices.is_empty() {
            self.image_buffers.vertex = None;
            self.image_buffers.index = None;
            return;
        }

        self.image_buffers.vertex = Some(self.gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Image Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.image_buffers.index = Some(self.gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Image Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
    }
}
