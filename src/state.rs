use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use uuid::Uuid;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, Surface, SurfaceConfiguration};
use winit::keyboard::ModifiersState;

use crate::canvas::{CanvasTransform, Uniforms};
use crate::input::WinitInput;
use crate::texture::ImageTexture;

pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub image_pipeline: RenderPipeline,
    pub texture_layout: BindGroupLayout,
    pub sampler: Sampler,
}

/// Transform published by the viewport and not yet written to the GPU.
pub type PendingTransform = Rc<Cell<Option<CanvasTransform>>>;

pub struct Canvas {
    pub uniform: Uniforms,
    pub uniform_buffer: Buffer,
    pub uniform_bind_group: BindGroup,
    pub pending: PendingTransform,
}

/// World-space quads for every placed image, drawn in placement order.
pub struct ImageBuffers {
    pub vertex: Option<Buffer>,
    pub index: Option<Buffer>,
    pub draws: Vec<Uuid>,
    pub textures: HashMap<Uuid, ImageTexture>,
    pub generation: Option<u64>,
}

pub struct InputState {
    pub winit: WinitInput,
    pub modifiers: ModifiersState,
}
