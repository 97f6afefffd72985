use winit::keyboard::{KeyCode, ModifiersState};

/// View and canvas commands that do not come from a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    ResetView,
    ZoomIn,
    ZoomOut,
    ClearImages,
}

pub fn action_for_key(key: KeyCode, modifiers: ModifiersState) -> Option<ToolbarAction> {
    let is_ctrl_or_cmd = modifiers.control_key() || modifiers.super_key();

    match key {
        KeyCode::Digit0 | KeyCode::KeyR if !is_ctrl_or_cmd => Some(ToolbarAction::ResetView),
        KeyCode::Equal | KeyCode::NumpadAdd if is_ctrl_or_cmd => Some(ToolbarAction::ZoomIn),
        KeyCode::Minus | KeyCode::NumpadSubtract if is_ctrl_or_cmd => {
            Some(ToolbarAction::ZoomOut)
        }
        KeyCode::Delete => Some(ToolbarAction::ClearImages),
        _ => None,
    }
}
