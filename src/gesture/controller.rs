use crate::canvas::{DEFAULT_ZOOM_FACTOR, Viewport};
use crate::gesture::PinchSession;
use crate::input::{InputEvent, InputHandler, PointerPhase};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Panning,
    Pinching(PinchSession),
}

/// Classifies pointer samples into pan, pinch and wheel zoom and drives the viewport.
///
/// Transitions depend only on the phase and the contacts left after the event,
/// never on how the gesture got there.
#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    zoom_factor: f32,
}

impl GestureController {
    pub fn new(zoom_factor: f32) -> Self {
        Self {
            state: GestureState::Idle,
            zoom_factor,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Drops whatever gesture is running, e.g. when another handler takes the pointer.
    pub fn cancel(&mut self, viewport: &mut Viewport) {
        viewport.stop_pan();
        self.state = GestureState::Idle;
    }

    fn on_pointer(&mut self, viewport: &mut Viewport, phase: PointerPhase, contacts: &[[f32; 2]]) {
        let next = match (phase, contacts) {
            (PointerPhase::Cancel, _) | (_, []) => {
                viewport.stop_pan();
                GestureState::Idle
            }
            (PointerPhase::Down | PointerPhase::Up, [p]) => {
                viewport.start_pan(*p);
                GestureState::Panning
            }
            (PointerPhase::Down | PointerPhase::Up, [a, b, ..]) => {
                viewport.stop_pan();
                GestureState::Pinching(PinchSession::begin(*a, *b, viewport.scale()))
            }
            (PointerPhase::Move, [p]) => {
                if self.state == GestureState::Panning {
                    viewport.update_pan(*p);
                }
                self.state
            }
            (PointerPhase::Move, [a, b, ..]) => match self.state {
                GestureState::Pinching(mut session) => {
                    session.update(viewport, *a, *b);
                    GestureState::Pinching(session)
                }
                _ => {
                    viewport.stop_pan();
                    GestureState::Pinching(PinchSession::begin(*a, *b, viewport.scale()))
                }
            },
        };

        if std::mem::discriminant(&next) != std::mem::discriminant(&self.state) {
            log::debug!("gesture {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    fn on_wheel(&mut self, viewport: &mut Viewport, position: [f32; 2], delta: f32) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        viewport.zoom_at(position, delta < 0.0, self.zoom_factor);
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_FACTOR)
    }
}

impl InputHandler for GestureController {
    fn handle(&mut self, viewport: &mut Viewport, event: &InputEvent) {
        match event {
            InputEvent::Pointer { phase, contacts } => self.on_pointer(viewport, *phase, contacts),
            InputEvent::Wheel { position, delta } => self.on_wheel(viewport, *position, *delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasTransform;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    fn viewport(scale: f32, offset: [f32; 2]) -> Viewport {
        Viewport::new(CanvasTransform { offset, scale })
    }

    fn send(
        gestures: &mut GestureController,
        viewport: &mut Viewport,
        phase: PointerPhase,
        contacts: &[[f32; 2]],
    ) {
        gestures.handle(viewport, &InputEvent::pointer(phase, contacts));
    }

    #[test]
    fn test_single_contact_pans() {
        let mut vp = viewport(1.0, [0.0, 0.0]);
        let mut gestures = GestureController::default();

        send(&mut gestures, &mut vp, PointerPhase::Down, &[[100.0, 100.0]]);
        assert_eq!(gestures.state(), GestureState::Panning);
        assert!(vp.is_panning());

        send(&mut gestures, &mut vp, PointerPhase::Move, &[[150.0, 120.0]]);
        assert_eq!(vp.offset(), [50.0, 20.0]);

        send(&mut gestures, &mut vp, PointerPhase::Up, &[]);
        assert_eq!(gestures.state(), GestureState::Idle);
        assert!(!vp.is_panning());

        send(&mut gestures, &mut vp, PointerPhase::Move, &[[300.0, 300.0]]);
        assert_eq!(vp.offset(), [50.0, 20.0]);
    }

    #[test]
    fn test_second_contact_cancels_pan_and_starts_pinch() {
        let mut vp = viewport(1.0, [0.0, 0.0]);
        let mut gestures = GestureController::default();

        send(&mut gestures, &mut vp, PointerPhase::Down, &[[100.0, 100.0]]);
        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Down,
            &[[100.0, 100.0], [200.0, 100.0]],
        );

        assert!(!vp.is_panning());
        match gestures.state() {
            GestureState::Pinching(session) => {
                assert!(approx(session.start_distance, 100.0));
                assert_eq!(session.start_scale, 1.0);
                assert_eq!(session.center, [150.0, 100.0]);
            }
            other => panic!("expected pinch, got {other:?}"),
        }
    }

    #[test]
    fn test_pinch_move_composes_zoom_then_translation() {
        let mut vp = viewport(1.0, [0.0, 0.0]);
        let mut gestures = GestureController::default();

        send(&mut gestures, &mut vp, PointerPhase::Down, &[[100.0, 100.0]]);
        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Down,
            &[[100.0, 100.0], [200.0, 100.0]],
        );
        let previous_center = [150.0, 100.0];
        let world = vp.screen_to_world(previous_center);

        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Move,
            &[[90.0, 100.0], [220.0, 100.0]],
        );

        let new_scale = 1.0 * (130.0 / 100.0);
        let anchored = [
            previous_center[0] - world[0] * new_scale,
            previous_center[1] - world[1] * new_scale,
        ];
        let expected = [anchored[0] + (155.0 - 150.0), anchored[1] + (100.0 - 100.0)];

        assert!(approx(vp.scale(), 1.3));
        assert!(approx(vp.offset()[0], expected[0]));
        assert!(approx(vp.offset()[1], expected[1]));
        assert!(approx(vp.offset()[0], -40.0));
        assert!(approx(vp.offset()[1], -30.0));
    }

    #[test]
    fn test_lifting_one_finger_reanchors_pan_at_remaining_contact() {
        let mut vp = viewport(1.0, [0.0, 0.0]);
        let mut gestures = GestureController::default();

        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Down,
            &[[100.0, 100.0], [200.0, 100.0]],
        );
        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Move,
            &[[80.0, 100.0], [220.0, 100.0]],
        );
        let after_pinch = vp.transform();

        send(&mut gestures, &mut vp, PointerPhase::Up, &[[220.0, 100.0]]);
        assert_eq!(gestures.state(), GestureState::Panning);
        assert_eq!(vp.transform(), after_pinch);

        send(&mut gestures, &mut vp, PointerPhase::Move, &[[230.0, 110.0]]);
        assert!(approx(vp.offset()[0], after_pinch.offset[0] + 10.0));
        assert!(approx(vp.offset()[1], after_pinch.offset[1] + 10.0));
        assert_eq!(vp.scale(), after_pinch.scale);
    }

    #[test]
    fn test_all_contacts_lifted_stops_everything() {
        let mut vp = viewport(1.0, [0.0, 0.0]);
        let mut gestures = GestureController::default();

        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Down,
            &[[0.0, 0.0], [10.0, 0.0]],
        );
        send(&mut gestures, &mut vp, PointerPhase::Up, &[]);

        assert_eq!(gestures.state(), GestureState::Idle);
        assert!(!vp.is_panning());
    }

    #[test]
    fn test_cancel_with_contacts_left_goes_idle() {
        let mut vp = viewport(1.0, [0.0, 0.0]);
        let mut gestures = GestureController::default();

        send(&mut gestures, &mut vp, PointerPhase::Down, &[[5.0, 5.0]]);
        send(&mut gestures, &mut vp, PointerPhase::Cancel, &[[5.0, 5.0]]);

        assert_eq!(gestures.state(), GestureState::Idle);
        assert!(!vp.is_panning());
    }

    #[test]
    fn test_two_contact_move_without_down_starts_session() {
        let mut vp = viewport(2.0, [10.0, 10.0]);
        let mut gestures = GestureController::default();

        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Move,
            &[[0.0, 0.0], [50.0, 0.0]],
        );

        assert!(matches!(gestures.state(), GestureState::Pinching(_)));
        assert_eq!(vp.transform().offset, [10.0, 10.0]);
    }

    #[test]
    fn test_coincident_pinch_stays_finite() {
        let mut vp = viewport(1.0, [400.0, 300.0]);
        let mut gestures = GestureController::default();

        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Down,
            &[[100.0, 100.0], [100.0, 100.0]],
        );
        send(
            &mut gestures,
            &mut vp,
            PointerPhase::Move,
            &[[90.0, 100.0], [110.0, 100.0]],
        );

        let t = vp.transform();
        assert!(t.is_finite());
        assert!(t.scale > 0.0);
    }

    #[test]
    fn test_wheel_zooms_at_cursor_without_touching_gesture_state() {
        let mut vp = viewport(1.0, [400.0, 300.0]);
        let mut gestures = GestureController::default();
        let cursor = [250.0, 180.0];
        let before = vp.screen_to_world(cursor);

        gestures.handle(
            &mut vp,
            &InputEvent::Wheel {
                position: cursor,
                delta: -3.0,
            },
        );
        assert!(approx(vp.scale(), 1.1));
        let after = vp.screen_to_world(cursor);
        assert!(approx(before[0], after[0]));
        assert!(approx(before[1], after[1]));

        gestures.handle(
            &mut vp,
            &InputEvent::Wheel {
                position: cursor,
                delta: 3.0,
            },
        );
        assert!(approx(vp.scale(), 1.0));
        assert_eq!(gestures.state(), GestureState::Idle);
    }
}
