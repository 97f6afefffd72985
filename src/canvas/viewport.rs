use crate::canvas::CanvasTransform;

/// Multiplier applied per wheel tick or zoom shortcut.
pub const DEFAULT_ZOOM_FACTOR: f32 = 1.1;

/// Receives the transform every time the viewport changes it.
pub trait TransformSink {
    fn transform_changed(&mut self, transform: &CanvasTransform);
}

impl<F: FnMut(&CanvasTransform)> TransformSink for F {
    fn transform_changed(&mut self, transform: &CanvasTransform) {
        self(transform)
    }
}

/// Optional bounds on the zoom factor. Both ends are open by default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScaleLimits {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl ScaleLimits {
    pub fn new(min: Option<f32>, max: Option<f32>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => Self {
                min: Some(hi),
                max: Some(lo),
            },
            _ => Self { min, max },
        }
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        let mut scale = scale;
        if let Some(min) = self.min {
            scale = scale.max(min);
        }
        if let Some(max) = self.max {
            scale = scale.min(max);
        }
        scale
    }
}

/// Owns the screen<->world mapping of one canvas.
///
/// This is the only place `scale` and `offset` are written. Every change is
/// published to the attached [`TransformSink`].
pub struct Viewport {
    transform: CanvasTransform,
    panning: bool,
    pan_anchor: [f32; 2],
    limits: ScaleLimits,
    sink: Option<Box<dyn TransformSink>>,
}

impl Viewport {
    pub fn new(transform: CanvasTransform) -> Self {
        Self {
            transform,
            panning: false,
            pan_anchor: [0.0, 0.0],
            limits: ScaleLimits::default(),
            sink: None,
        }
    }

    /// Starts with the world origin at `center`, usually the middle of the window.
    pub fn centered(center: [f32; 2]) -> Self {
        Self::new(CanvasTransform {
            offset: center,
            scale: 1.0,
        })
    }

    pub fn set_sink(&mut self, sink: impl TransformSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn transform(&self) -> CanvasTransform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn offset(&self) -> [f32; 2] {
        self.transform.offset
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    /// Installs new scale limits. A scale outside them is clamped in place: the
    /// offset is kept, so the view scales about the world origin's screen position
    /// rather than a focal point. Use [`Viewport::zoom_at`] for focal zooms.
    pub fn set_limits(&mut self, limits: ScaleLimits) {
        self.limits = limits;
        let clamped = limits.clamp(self.transform.scale);
        if clamped != self.transform.scale {
            self.transform.scale = clamped;
            self.publish();
        }
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        self.limits.clamp(scale)
    }

    pub fn screen_to_world(&self, screen_pos: [f32; 2]) -> [f32; 2] {
        self.transform.screen_to_world(screen_pos)
    }

    pub fn world_to_screen(&self, world_pos: [f32; 2]) -> [f32; 2] {
        self.transform.world_to_screen(world_pos)
    }

    /// Zooms by `factor` keeping the world point under `screen_pos` in place.
    pub fn zoom_at(&mut self, screen_pos: [f32; 2], zoom_in: bool, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("ignoring zoom with factor {factor}");
            return;
        }

        // Must be taken before the scale changes.
        let world = self.screen_to_world(screen_pos);

        let scale = if zoom_in {
            self.transform.scale * factor
        } else {
            self.transform.scale / factor
        };
        let scale = self.limits.clamp(scale);
        if !(scale.is_finite() && scale > 0.0) {
            log::warn!("zoom would leave scale at {scale}, keeping {}", self.transform.scale);
            return;
        }

        self.transform.scale = scale;
        self.transform.offset = [
            screen_pos[0] - world[0] * scale,
            screen_pos[1] - world[1] * scale,
        ];
        self.publish();
    }

    pub fn start_pan(&mut self, screen_pos: [f32; 2]) {
        self.pan_anchor = [
            screen_pos[0] - self.transform.offset[0],
            screen_pos[1] - self.transform.offset[1],
        ];
        self.panning = true;
    }

    pub fn update_pan(&mut self, screen_pos: [f32; 2]) {
        if !self.panning {
            return;
        }

        self.transform.offset = [
            screen_pos[0] - self.pan_anchor[0],
            screen_pos[1] - self.pan_anchor[1],
        ];
        self.publish();
    }

    pub fn stop_pan(&mut self) {
        self.panning = false;
    }

    /// Replaces the transform outright. Rejects values that would poison later math.
    pub fn set_scale_and_offset(&mut self, scale: f32, offset: [f32; 2]) {
        let next = CanvasTransform {
            offset,
            scale: self.limits.clamp(scale),
        };
        if !next.is_finite() || next.scale <= 0.0 {
            log::warn!("rejecting transform {next}");
            return;
        }

        self.transform = next;
        self.publish();
    }

    /// Back to scale 1 with the world origin at `center`.
    pub fn reset(&mut self, center: [f32; 2]) {
        self.panning = false;
        self.set_scale_and_offset(1.0, center);
    }

    fn publish(&mut self) {
        log::trace!("viewport transform: {}", self.transform);
        if let Some(sink) = self.sink.as_mut() {
            sink.transform_changed(&self.transform);
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(CanvasTransform::new())
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("transform", &self.transform)
            .field("panning", &self.panning)
            .field("pan_anchor", &self.pan_anchor)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    fn viewport(scale: f32, offset: [f32; 2]) -> Viewport {
        Viewport::new(CanvasTransform { offset, scale })
    }

    #[test]
    fn test_zoom_at_offset_origin_keeps_offset() {
        let mut vp = viewport(1.0, [400.0, 300.0]);

        vp.zoom_at([400.0, 300.0], true, 1.1);

        assert!(approx(vp.scale(), 1.1));
        assert_eq!(vp.offset(), [400.0, 300.0]);
    }

    #[test]
    fn test_zoom_keeps_focal_point() {
        let starts = [
            (1.0, [0.0, 0.0]),
            (0.25, [-130.0, 42.0]),
            (3.7, [512.0, -77.5]),
        ];
        let focals = [[0.0, 0.0], [250.0, 125.0], [-40.0, 900.0]];

        for (scale, offset) in starts {
            for focal in focals {
                let mut vp = viewport(scale, offset);
                let before = vp.screen_to_world(focal);

                vp.zoom_at(focal, true, DEFAULT_ZOOM_FACTOR);
                let after = vp.screen_to_world(focal);

                assert!(approx(before[0], after[0]), "{before:?} vs {after:?}");
                assert!(approx(before[1], after[1]), "{before:?} vs {after:?}");
            }
        }
    }

    #[test]
    fn test_zoom_in_then_out_restores_transform() {
        let mut vp = viewport(1.3, [17.0, -220.0]);

        vp.zoom_at([300.0, 150.0], true, 1.1);
        vp.zoom_at([300.0, 150.0], false, 1.1);

        assert!(approx(vp.scale(), 1.3));
        assert!(approx(vp.offset()[0], 17.0));
        assert!(approx(vp.offset()[1], -220.0));
    }

    #[test]
    fn test_zoom_is_unbounded_by_default() {
        let mut vp = Viewport::default();

        for _ in 0..100 {
            vp.zoom_at([10.0, 10.0], true, 1.1);
        }

        assert!(vp.scale() > 10_000.0);
    }

    #[test]
    fn test_limits_clamp_zoom_without_moving_focal_point() {
        let mut vp = viewport(1.0, [0.0, 0.0]);
        vp.set_limits(ScaleLimits::new(Some(0.5), Some(2.0)));
        let before = vp.screen_to_world([200.0, 100.0]);

        for _ in 0..20 {
            vp.zoom_at([200.0, 100.0], true, 1.1);
        }
        let after = vp.screen_to_world([200.0, 100.0]);

        assert!(approx(vp.scale(), 2.0));
        assert!(approx(before[0], after[0]));
        assert!(approx(before[1], after[1]));

        for _ in 0..40 {
            vp.zoom_at([200.0, 100.0], false, 1.1);
        }
        assert!(approx(vp.scale(), 0.5));
    }

    #[test]
    fn test_swapped_limits_are_normalized() {
        let limits = ScaleLimits::new(Some(4.0), Some(0.5));

        assert_eq!(limits.min, Some(0.5));
        assert_eq!(limits.max, Some(4.0));
    }

    #[test]
    fn test_set_limits_clamps_scale_in_place() {
        let mut vp = viewport(5.0, [120.0, -40.0]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        vp.set_sink(move |t: &CanvasTransform| log.borrow_mut().push(*t));

        vp.set_limits(ScaleLimits::new(None, Some(2.0)));
        assert!(approx(vp.scale(), 2.0));
        assert_eq!(vp.offset(), [120.0, -40.0]);
        assert_eq!(seen.borrow().len(), 1);

        // Already inside the new bounds: nothing to publish.
        vp.set_limits(ScaleLimits::new(Some(0.5), Some(3.0)));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_pan_follows_pointer() {
        let mut vp = viewport(1.0, [0.0, 0.0]);

        vp.start_pan([100.0, 100.0]);
        vp.update_pan([150.0, 120.0]);

        assert_eq!(vp.offset(), [50.0, 20.0]);
    }

    #[test]
    fn test_repeated_update_at_anchor_does_not_drift() {
        let mut direct = viewport(2.0, [30.0, 40.0]);
        direct.start_pan([10.0, 10.0]);
        direct.update_pan([70.0, -5.0]);

        let mut stepped = viewport(2.0, [30.0, 40.0]);
        stepped.start_pan([10.0, 10.0]);
        stepped.update_pan([10.0, 10.0]);
        stepped.update_pan([70.0, -5.0]);

        assert_eq!(direct.offset(), stepped.offset());
    }

    #[test]
    fn test_update_pan_without_start_is_ignored() {
        let mut vp = viewport(1.0, [5.0, 5.0]);

        vp.update_pan([100.0, 100.0]);
        vp.start_pan([0.0, 0.0]);
        vp.stop_pan();
        vp.stop_pan();
        vp.update_pan([100.0, 100.0]);

        assert_eq!(vp.offset(), [5.0, 5.0]);
        assert!(!vp.is_panning());
    }

    #[test]
    fn test_start_pan_twice_reanchors() {
        let mut vp = viewport(1.0, [0.0, 0.0]);

        vp.start_pan([0.0, 0.0]);
        vp.update_pan([10.0, 0.0]);
        vp.start_pan([50.0, 50.0]);
        vp.update_pan([60.0, 50.0]);

        assert_eq!(vp.offset(), [20.0, 0.0]);
    }

    #[test]
    fn test_non_finite_transform_is_rejected() {
        let mut vp = viewport(1.5, [10.0, 20.0]);

        vp.set_scale_and_offset(f32::NAN, [0.0, 0.0]);
        vp.set_scale_and_offset(2.0, [f32::INFINITY, 0.0]);
        vp.set_scale_and_offset(0.0, [0.0, 0.0]);

        assert_eq!(vp.scale(), 1.5);
        assert_eq!(vp.offset(), [10.0, 20.0]);
    }

    #[test]
    fn test_reset_returns_to_center() {
        let mut vp = viewport(3.0, [-50.0, 80.0]);
        vp.start_pan([0.0, 0.0]);

        vp.reset([640.0, 360.0]);

        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), [640.0, 360.0]);
        assert!(!vp.is_panning());
    }

    #[test]
    fn test_sink_sees_every_transform_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut vp = viewport(1.0, [0.0, 0.0]);
        let log = seen.clone();
        vp.set_sink(move |t: &CanvasTransform| log.borrow_mut().push(*t));

        vp.start_pan([0.0, 0.0]);
        vp.update_pan([5.0, 5.0]);
        vp.stop_pan();
        vp.zoom_at([5.0, 5.0], true, 2.0);
        vp.set_scale_and_offset(1.0, [1.0, 2.0]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].offset, [5.0, 5.0]);
        assert_eq!(seen[1].scale, 2.0);
        assert_eq!(seen[2].offset, [1.0, 2.0]);
    }
}
