use image::RgbaImage;
use image::imageops::FilterType;

pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("image_texture_bind_group_layout"),
    })
}

pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Image Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

/// Size an image must be cut down to so neither side exceeds `max_dimension`.
pub fn fit_texture_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }
    let k = max_dimension as f64 / longest as f64;
    (
        ((width as f64 * k) as u32).max(1),
        ((height as f64 * k) as u32).max(1),
    )
}

/// A placed image uploaded to the GPU, bound at group 1 of the image pipeline.
pub struct ImageTexture {
    pub bind_group: wgpu::BindGroup,
}

impl ImageTexture {
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        rgba: &RgbaImage,
        label: &str,
    ) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let (width, height) = fit_texture_size(rgba.width(), rgba.height(), max_dimension);
        let resized;
        let rgba = if (width, height) != rgba.dimensions() {
            log::info!(
                "{label}: downscaling {}x{} to {width}x{height} for the GPU",
                rgba.width(),
                rgba.height()
            );
            resized = image::imageops::resize(rgba, width, height, FilterType::Triangle);
            &resized
        } else {
            rgba
        };

        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if width > 0 && height > 0 {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                rgba.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                size,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(label),
        });

        Self { bind_group }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_texture_size() {
        assert_eq!(fit_texture_size(640, 480, 8192), (640, 480));
        assert_eq!(fit_texture_size(16384, 4096, 8192), (8192, 2048));
        assert_eq!(fit_texture_size(20000, 1, 8192), (8192, 1));
    }
}
