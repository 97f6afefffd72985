use crate::canvas::Viewport;

/// Contacts closer than this, in screen pixels, give no usable zoom ratio.
pub const MIN_PINCH_DISTANCE: f32 = 1.0;

pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

pub fn midpoint(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

/// Two-contact zoom+pan session, captured when the second finger lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSession {
    pub start_distance: f32,
    pub start_scale: f32,
    /// Midpoint of the contacts at the last update.
    pub center: [f32; 2],
}

impl PinchSession {
    pub fn begin(a: [f32; 2], b: [f32; 2], scale: f32) -> Self {
        Self {
            start_distance: distance(a, b),
            start_scale: scale,
            center: midpoint(a, b),
        }
    }

    fn is_degenerate(&self) -> bool {
        self.start_distance < MIN_PINCH_DISTANCE
    }

    /// Applies one move of the two contacts to `viewport`.
    ///
    /// The zoom is anchored at the previous midpoint first, then the midpoint's
    /// own movement is added on top.
    pub fn update(&mut self, viewport: &mut Viewport, a: [f32; 2], b: [f32; 2]) {
        let new_distance = distance(a, b);
        let new_center = midpoint(a, b);

        let world = viewport.screen_to_world(self.center);

        let new_scale = if self.is_degenerate() {
            // Fingers started on top of each other: no ratio to take yet, so
            // this frame only pans. Seed the session once they separate.
            if new_distance >= MIN_PINCH_DISTANCE {
                self.start_distance = new_distance;
                self.start_scale = viewport.scale();
                log::debug!("pinch re-seeded at distance {new_distance}");
            }
            viewport.scale()
        } else {
            viewport.clamp_scale(self.start_scale * (new_distance / self.start_distance))
        };

        let delta = [new_center[0] - self.center[0], new_center[1] - self.center[1]];
        let (new_scale, offset) = if new_scale.is_finite() && new_scale > 0.0 {
            let anchored = [
                self.center[0] - world[0] * new_scale,
                self.center[1] - world[1] * new_scale,
            ];
            (new_scale, [anchored[0] + delta[0], anchored[1] + delta[1]])
        } else {
            // Fingers met with no lower limit set: keep the scale, still follow the midpoint.
            let offset = viewport.offset();
            (viewport.scale(), [offset[0] + delta[0], offset[1] + delta[1]])
        };

        viewport.set_scale_and_offset(new_scale, offset);
        self.center = new_center;
    }
}
