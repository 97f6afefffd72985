mod controller;
mod listeners;
mod pinch;

pub use controller::{GestureController, GestureState};
pub use listeners::{InputDispatcher, Listener, ListenerGuard, Propagation};
pub use pinch::{MIN_PINCH_DISTANCE, PinchSession, distance, midpoint};
