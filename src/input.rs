use crate::canvas::Viewport;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Device-independent input sample, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// `contacts` holds every contact still active after the event, oldest first.
    /// A pressed mouse is a single contact.
    Pointer {
        phase: PointerPhase,
        contacts: Vec<[f32; 2]>,
    },
    /// Negative `delta` scrolls up, the same sign as a browser `deltaY`.
    Wheel { position: [f32; 2], delta: f32 },
}

impl InputEvent {
    pub fn pointer(phase: PointerPhase, contacts: &[[f32; 2]]) -> Self {
        InputEvent::Pointer {
            phase,
            contacts: contacts.to_vec(),
        }
    }

    pub fn contacts(&self) -> &[[f32; 2]] {
        match self {
            InputEvent::Pointer { contacts, .. } => contacts,
            InputEvent::Wheel { .. } => &[],
        }
    }
}

/// Consumer side of the input stream. Handlers may only move the view through `viewport`.
pub trait InputHandler {
    fn handle(&mut self, viewport: &mut Viewport, event: &InputEvent);
}

/// Turns winit window events into [`InputEvent`]s.
///
/// Touches are kept in the order they went down so the first two contacts stay
/// stable while others come and go.
#[derive(Debug, Default)]
pub struct WinitInput {
    cursor: [f32; 2],
    mouse_button: Option<MouseButton>,
    touches: Vec<(u64, [f32; 2])>,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> [f32; 2] {
        self.cursor
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved([position.x as f32, position.y as f32])
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*state == ElementState::Pressed, *button)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.wheel(delta)
            }
            WindowEvent::Touch(touch) => Some(self.touch(
                touch.id,
                touch.phase,
                [touch.location.x as f32, touch.location.y as f32],
            )),
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, pos: [f32; 2]) -> Option<InputEvent> {
        self.cursor = pos;
        self.mouse_button
            .map(|_| InputEvent::pointer(PointerPhase::Move, &[pos]))
    }

    pub fn cursor_left(&mut self) -> Option<InputEvent> {
        self.mouse_button
            .take()
            .map(|_| InputEvent::pointer(PointerPhase::Cancel, &[]))
    }

    pub fn mouse_input(&mut self, pressed: bool, button: MouseButton) -> Option<InputEvent> {
        if !matches!(button, MouseButton::Left | MouseButton::Middle) {
            return None;
        }

        match (pressed, self.mouse_button) {
            (true, None) => {
                self.mouse_button = Some(button);
                Some(InputEvent::pointer(PointerPhase::Down, &[self.cursor]))
            }
            (false, Some(held)) if held == button => {
                self.mouse_button = None;
                Some(InputEvent::pointer(PointerPhase::Up, &[]))
            }
            _ => None,
        }
    }

    pub fn wheel(&mut self, delta: f32) -> Option<InputEvent> {
        if delta == 0.0 {
            return None;
        }
        Some(InputEvent::Wheel {
            position: self.cursor,
            delta,
        })
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, pos: [f32; 2]) -> InputEvent {
        let phase = match phase {
            TouchPhase::Started => {
                match self.touches.iter_mut().find(|(tid, _)| *tid == id) {
                    Some(entry) => entry.1 = pos,
                    None => self.touches.push((id, pos)),
                }
                PointerPhase::Down
            }
            TouchPhase::Moved => {
                if let Some(entry) = self.touches.iter_mut().find(|(tid, _)| *tid == id) {
                    entry.1 = pos;
                }
                PointerPhase::Move
            }
            TouchPhase::Ended => {
                self.touches.retain(|(tid, _)| *tid != id);
                PointerPhase::Up
            }
            TouchPhase::Cancelled => {
                self.touches.retain(|(tid, _)| *tid != id);
                if self.touches.is_empty() {
                    PointerPhase::Cancel
                } else {
                    PointerPhase::Up
                }
            }
        };

        InputEvent::Pointer {
            phase,
            contacts: self.touches.iter().map(|(_, p)| *p).collect(),
        }
    }
}
