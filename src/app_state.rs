use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::canvas::{CanvasTransform, Uniforms};
use crate::config::ViewerConfig;
use crate::gesture::InputDispatcher;
use crate::images::load_image;
use crate::input::WinitInput;
use crate::scene::CanvasScene;
use crate::state::{Canvas, GpuContext, ImageBuffers, InputState, PendingTransform};
use crate::texture;
use crate::vertex::Vertex;

pub struct State {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    pub gpu: GpuContext,
    pub canvas: Canvas,
    pub image_buffers: ImageBuffers,
    pub input: InputState,

    pub scene: CanvasScene,
    pub dispatcher: InputDispatcher<CanvasScene>,
    pub background: [f32; 4],
}

impl State {
    pub async fn new(
        window: Arc<Window>,
        config: &ViewerConfig,
        startup_images: &[PathBuf],
    ) -> anyhow::Result<State> {
        #[allow(unused_mut)]
        let mut size = window.inner_size();

        #[cfg(target_arch = "wasm32")]
        {
            if size.width == 0 || size.height == 0 {
                size = winit::dpi::PhysicalSize::new(1920, 1080);
            }
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;

        let config_surface = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config_surface);

        let view_size = [size.width as f32, size.height as f32];
        let mut scene = CanvasScene::new(config, view_size);

        let uniforms = Uniforms::new(&scene.viewport.transform(), (view_size[0], view_size[1]));
        let pending: PendingTransform = Rc::new(Cell::new(None));
        let sink = pending.clone();
        scene
            .viewport
            .set_sink(move |transform: &CanvasTransform| sink.set(Some(*transform)));

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let texture_layout = texture::bind_group_layout(&device);
        let sampler = texture::create_sampler(&device);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Image Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../data/shaders/image_shader.wgsl").into(),
            ),
        });

        let image_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Image Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let image_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Image Pipeline"),
            layout: Some(&image_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config_surface.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let gpu = GpuContext {
            surface,
            device,
            queue,
            config: config_surface,
            image_pipeline,
            texture_layout,
            sampler,
        };

        let canvas = Canvas {
            uniform: uniforms,
            uniform_buffer,
            uniform_bind_group,
            pending,
        };

        let image_buffers = ImageBuffers {
            vertex: None,
            index: None,
            draws: Vec::new(),
            textures: HashMap::new(),
            generation: None,
        };

        let input = InputState {
            winit: WinitInput::new(),
            modifiers: winit::keyboard::ModifiersState::empty(),
        };

        let mut state = Self {
            window,
            size,
            gpu,
            canvas,
            image_buffers,
            input,
            scene,
            dispatcher: InputDispatcher::new(),
            background: config.background,
        };

        for path in startup_images {
            state.add_image_from(path);
        }

        Ok(state)
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Loads `path` and places it in the middle of the view. Failures are logged and skipped.
    pub fn add_image_from(&mut self, path: &Path) {
        match load_image(path) {
            Ok(rgba) => {
                let id = self.scene.add_image(Arc::new(rgba));
                log::info!("added {} as {id}", path.display());
            }
            Err(err) => log::error!("{err:#}"),
        }
    }
}
