use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;
use uuid::Uuid;

use crate::canvas::Viewport;

/// An image placed on the canvas. `position` is its top-left corner in world space.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub id: Uuid,
    pub pixels: Arc<RgbaImage>,
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub dragging: bool,
    /// Screen-space distance from the image's top-left corner to the grab point.
    pub drag_offset: [f32; 2],
}

impl PlacedImage {
    pub fn contains(&self, world_pos: [f32; 2]) -> bool {
        world_pos[0] >= self.position[0]
            && world_pos[0] <= self.position[0] + self.size[0]
            && world_pos[1] >= self.position[1]
            && world_pos[1] <= self.position[1] + self.size[1]
    }
}

/// Natural size of a `width` x `height` image, shrunk so its longest side fits `max_extent`.
pub fn fit_size(width: u32, height: u32, max_extent: f32) -> [f32; 2] {
    let (w, h) = (width as f32, height as f32);
    let longest = w.max(h);
    if longest <= max_extent || longest == 0.0 {
        return [w, h];
    }
    let k = max_extent / longest;
    [w * k, h * k]
}

pub fn load_image(path: &Path) -> anyhow::Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?;
    let rgba = img.to_rgba8();
    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

#[derive(Debug, Default)]
pub struct ImageManager {
    images: Vec<PlacedImage>,
    dragging: Option<Uuid>,
    generation: u64,
}

impl ImageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Bumped on every change to the placed images; renderers compare it to skip rebuilds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: Uuid) -> Option<&PlacedImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn add_image(&mut self, pixels: Arc<RgbaImage>, position: [f32; 2], max_extent: f32) -> Uuid {
        let id = Uuid::new_v4();
        let size = fit_size(pixels.width(), pixels.height(), max_extent);
        self.images.push(PlacedImage {
            id,
            pixels,
            position,
            size,
            dragging: false,
            drag_offset: [0.0, 0.0],
        });
        self.generation += 1;
        log::debug!("placed image {id} at {position:?} size {size:?}");
        id
    }

    /// Places the image centred on whatever world point is in the middle of the view.
    pub fn add_image_centered(
        &mut self,
        pixels: Arc<RgbaImage>,
        viewport: &Viewport,
        view_size: [f32; 2],
        max_extent: f32,
    ) -> Uuid {
        let center = viewport.screen_to_world([view_size[0] / 2.0, view_size[1] / 2.0]);
        let size = fit_size(pixels.width(), pixels.height(), max_extent);
        let position = [center[0] - size[0] / 2.0, center[1] - size[1] / 2.0];
        self.add_image(pixels, position, max_extent)
    }

    /// Topmost image under `world_pos`.
    pub fn hit_test(&self, world_pos: [f32; 2]) -> Option<Uuid> {
        self.images
            .iter()
            .rev()
            .find(|img| img.contains(world_pos))
            .map(|img| img.id)
    }

    pub fn dragging(&self) -> Option<Uuid> {
        self.dragging
    }

    pub fn begin_drag(&mut self, id: Uuid, screen_pos: [f32; 2], viewport: &Viewport) -> bool {
        self.end_drag();

        let Some(img) = self.images.iter_mut().find(|img| img.id == id) else {
            return false;
        };
        let top_left = viewport.world_to_screen(img.position);
        img.drag_offset = [screen_pos[0] - top_left[0], screen_pos[1] - top_left[1]];
        img.dragging = true;
        self.dragging = Some(id);
        true
    }

    pub fn drag_to(&mut self, screen_pos: [f32; 2], viewport: &Viewport) {
        let Some(id) = self.dragging else {
            return;
        };
        if let Some(img) = self.images.iter_mut().find(|img| img.id == id) {
            img.position = viewport.screen_to_world([
                screen_pos[0] - img.drag_offset[0],
                screen_pos[1] - img.drag_offset[1],
            ]);
            self.generation += 1;
        }
    }

    pub fn end_drag(&mut self) {
        if let Some(id) = self.dragging.take() {
            if let Some(img) = self.images.iter_mut().find(|img| img.id == id) {
                img.dragging = false;
            }
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.images.len();
        self.images.retain(|img| img.id != id);
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        let removed = self.images.len() != before;
        if removed {
            self.generation += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        if self.images.is_empty() {
            return;
        }
        log::info!("clearing {} images", self.images.len());
        self.images.clear();
        self.dragging = None;
        self.generation += 1;
    }
}
