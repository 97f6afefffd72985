mod canvas_transform;
mod uniform;
mod viewport;

pub use canvas_transform::CanvasTransform;
pub use uniform::Uniforms;
pub use viewport::{DEFAULT_ZOOM_FACTOR, ScaleLimits, TransformSink, Viewport};
