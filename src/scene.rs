use std::sync::Arc;

use image::RgbaImage;
use uuid::Uuid;

use crate::canvas::Viewport;
use crate::config::ViewerConfig;
use crate::gesture::{GestureController, InputDispatcher, Listener, ListenerGuard, Propagation};
use crate::images::ImageManager;
use crate::input::{InputEvent, InputHandler, PointerPhase};
use crate::toolbar::ToolbarAction;

/// Everything input can touch on one canvas.
#[derive(Debug)]
pub struct CanvasScene {
    pub viewport: Viewport,
    pub gestures: GestureController,
    pub images: ImageManager,
    drag: Option<ListenerGuard>,
    view_size: [f32; 2],
    image_max_extent: f32,
}

impl CanvasScene {
    /// World origin starts in the middle of the view.
    pub fn new(config: &ViewerConfig, view_size: [f32; 2]) -> Self {
        let mut viewport = Viewport::centered(view_center(view_size));
        viewport.set_limits(config.scale_limits());

        Self {
            viewport,
            gestures: GestureController::new(config.zoom_factor),
            images: ImageManager::new(),
            drag: None,
            view_size,
            image_max_extent: config.image_max_extent,
        }
    }

    pub fn view_size(&self) -> [f32; 2] {
        self.view_size
    }

    pub fn resize(&mut self, view_size: [f32; 2]) {
        self.view_size = view_size;
    }

    pub fn is_dragging_image(&self) -> bool {
        self.drag.is_some()
    }

    pub fn add_image(&mut self, pixels: Arc<RgbaImage>) -> Uuid {
        self.images
            .add_image_centered(pixels, &self.viewport, self.view_size, self.image_max_extent)
    }

    pub fn apply(&mut self, action: ToolbarAction) {
        log::debug!("toolbar: {action:?}");
        let center = view_center(self.view_size);
        match action {
            ToolbarAction::ResetView => {
                self.gestures.cancel(&mut self.viewport);
                self.viewport.reset(center);
            }
            ToolbarAction::ZoomIn => {
                self.viewport
                    .zoom_at(center, true, self.gestures.zoom_factor());
            }
            ToolbarAction::ZoomOut => {
                self.viewport
                    .zoom_at(center, false, self.gestures.zoom_factor());
            }
            ToolbarAction::ClearImages => {
                self.end_image_drag();
                self.images.clear();
            }
        }
    }

    fn end_image_drag(&mut self) {
        self.images.end_drag();
        // Dropping the guard takes both drag listeners down with it.
        self.drag = None;
    }
}

fn view_center(view_size: [f32; 2]) -> [f32; 2] {
    [view_size[0] / 2.0, view_size[1] / 2.0]
}

/// Sends one input event through the canvas.
///
/// Registered listeners (an image drag in progress) see it first. A single
/// contact landing on an image starts dragging it. Everything else drives the
/// pan/zoom gestures.
pub fn route(dispatcher: &InputDispatcher<CanvasScene>, scene: &mut CanvasScene, event: &InputEvent) {
    if dispatcher.dispatch(scene, event) == Propagation::Stop {
        return;
    }

    if let InputEvent::Pointer {
        phase: PointerPhase::Down,
        contacts,
    } = event
    {
        if let [pos] = contacts.as_slice() {
            let world = scene.viewport.screen_to_world(*pos);
            if let Some(id) = scene.images.hit_test(world) {
                begin_image_drag(dispatcher, scene, id, *pos);
                return;
            }
        }
    }

    scene.gestures.handle(&mut scene.viewport, event);
}

/// Starts dragging `id` from `screen_pos`. The move and end listeners are
/// registered as one group and removed together when the drag ends.
pub fn begin_image_drag(
    dispatcher: &InputDispatcher<CanvasScene>,
    scene: &mut CanvasScene,
    id: Uuid,
    screen_pos: [f32; 2],
) {
    scene.gestures.cancel(&mut scene.viewport);
    scene.end_image_drag();
    if !scene.images.begin_drag(id, screen_pos, &scene.viewport) {
        return;
    }
    log::debug!("dragging image {id}");

    let on_move: Listener<CanvasScene> =
        Box::new(|scene: &mut CanvasScene, event: &InputEvent| match event {
            InputEvent::Pointer {
                phase: PointerPhase::Move,
                contacts,
            } => {
                if let Some(pos) = contacts.first() {
                    scene.images.drag_to(*pos, &scene.viewport);
                }
                Propagation::Stop
            }
            // Extra fingers while dragging are swallowed.
            InputEvent::Pointer {
                phase: PointerPhase::Down,
                ..
            } => Propagation::Stop,
            _ => Propagation::Continue,
        });

    let on_end: Listener<CanvasScene> =
        Box::new(|scene: &mut CanvasScene, event: &InputEvent| match event {
            InputEvent::Pointer {
                phase: PointerPhase::Up | PointerPhase::Cancel,
                ..
            } => {
                scene.end_image_drag();
                Propagation::Stop
            }
            _ => Propagation::Continue,
        });

    scene.drag = Some(dispatcher.register(vec![on_move, on_end]));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> CanvasScene {
        CanvasScene::new(&ViewerConfig::default(), [800.0, 600.0])
    }

    #[test]
    fn test_starts_centered() {
        let scene = scene();

        assert_eq!(scene.viewport.offset(), [400.0, 300.0]);
        assert_eq!(scene.viewport.scale(), 1.0);
    }

    #[test]
    fn test_reset_after_zoom() {
        let mut scene = scene();
        scene.apply(ToolbarAction::ZoomIn);
        scene.viewport.start_pan([0.0, 0.0]);
        scene.viewport.update_pan([40.0, 40.0]);

        scene.apply(ToolbarAction::ResetView);

        assert_eq!(scene.viewport.scale(), 1.0);
        assert_eq!(scene.viewport.offset(), [400.0, 300.0]);
    }

    #[test]
    fn test_zoom_buttons_keep_view_center_fixed() {
        let mut scene = scene();
        scene.viewport.set_scale_and_offset(1.7, [123.0, 45.0]);
        let before = scene.viewport.screen_to_world([400.0, 300.0]);

        scene.apply(ToolbarAction::ZoomIn);
        scene.apply(ToolbarAction::ZoomIn);
        scene.apply(ToolbarAction::ZoomOut);

        let after = scene.viewport.screen_to_world([400.0, 300.0]);
        assert!((before[0] - after[0]).abs() < 0.001);
        assert!((before[1] - after[1]).abs() < 0.001);
        assert!((scene.viewport.scale() - 1.7 * 1.1).abs() < 0.001);
    }

    #[test]
    fn test_clear_ends_running_drag() {
        let dispatcher = InputDispatcher::<CanvasScene>::new();
        let mut scene = scene();
        scene.add_image(Arc::new(RgbaImage::new(100, 100)));

        route(
            &dispatcher,
            &mut scene,
            &InputEvent::pointer(PointerPhase::Down, &[[400.0, 300.0]]),
        );
        assert!(scene.is_dragging_image());
        assert_eq!(dispatcher.len(), 2);

        scene.apply(ToolbarAction::ClearImages);

        assert!(scene.images.is_empty());
        assert!(!scene.is_dragging_image());
        assert!(dispatcher.is_empty());
    }
}
