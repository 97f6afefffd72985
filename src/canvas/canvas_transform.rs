use std::fmt;

/// Uniform pan+zoom mapping from world space to screen space.
///
/// A world point `w` lands on screen at `w * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub offset: [f32; 2],
    pub scale: f32,
}

impl CanvasTransform {
    pub fn new() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: 1.0,
        }
    }

    pub fn screen_to_world(&self, screen_pos: [f32; 2]) -> [f32; 2] {
        [
            (screen_pos[0] - self.offset[0]) / self.scale,
            (screen_pos[1] - self.offset[1]) / self.scale,
        ]
    }

    pub fn world_to_screen(&self, world_pos: [f32; 2]) -> [f32; 2] {
        [
            world_pos[0] * self.scale + self.offset[0],
            world_pos[1] * self.scale + self.offset[1],
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.offset[0].is_finite() && self.offset[1].is_finite()
    }
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats as the equivalent CSS transform, e.g. `translate(400px, 300px) scale(1.1)`.
impl fmt::Display for CanvasTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({}px, {}px) scale({})",
            self.offset[0], self.offset[1], self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_restores_screen_point() {
        let transform = CanvasTransform {
            offset: [123.5, -40.25],
            scale: 0.37,
        };
        let screen = [611.0, 87.0];

        let back = transform.world_to_screen(transform.screen_to_world(screen));

        assert!((back[0] - screen[0]).abs() < 0.001);
        assert!((back[1] - screen[1]).abs() < 0.001);
    }

    #[test]
    fn test_offset_maps_to_world_origin() {
        let transform = CanvasTransform {
            offset: [400.0, 300.0],
            scale: 2.5,
        };

        assert_eq!(transform.screen_to_world([400.0, 300.0]), [0.0, 0.0]);
    }

    #[test]
    fn test_display_reads_like_css() {
        let transform = CanvasTransform {
            offset: [400.0, 300.0],
            scale: 1.5,
        };

        assert_eq!(
            transform.to_string(),
            "translate(400px, 300px) scale(1.5)"
        );
    }
}
