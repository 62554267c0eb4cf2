//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard and mouse input to high-level actions like Exit, Press, etc.
//! Drags and scrolling are NOT mapped here - they go directly to OrbitController.

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Actions triggered by special input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Reset camera to the scene framing (R key)
    ResetCamera,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Toggle the idle wave of the grid (W key)
    ToggleWave,
    /// Start rig animations (Space)
    StartRigs,
    /// Pick and toggle the object under the cursor (left press)
    Press,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyW => Some(InputAction::ToggleWave),
            KeyCode::Space => Some(InputAction::StartRigs),
            _ => None,
        }
    }

    /// Map mouse button to an action
    ///
    /// A left press always picks, even when it starts an orbit drag.
    pub fn map_mouse_button(button: MouseButton, state: ElementState) -> Option<InputAction> {
        if button == MouseButton::Left && state == ElementState::Pressed {
            Some(InputAction::Press)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_exits() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert_eq!(action, Some(InputAction::Exit));
    }

    #[test]
    fn test_unmapped_keys() {
        for key in [KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD, KeyCode::KeyQ] {
            let action = InputMapper::map_keyboard(key, ElementState::Pressed);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_key_release_ignored() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Released);
        assert_eq!(action, None);
    }

    #[test]
    fn test_left_press_picks() {
        assert_eq!(
            InputMapper::map_mouse_button(MouseButton::Left, ElementState::Pressed),
            Some(InputAction::Press)
        );
        assert_eq!(InputMapper::map_mouse_button(MouseButton::Left, ElementState::Released), None);
        assert_eq!(InputMapper::map_mouse_button(MouseButton::Right, ElementState::Pressed), None);
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyR, ElementState::Pressed),
            Some(InputAction::ResetCamera)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyF, ElementState::Pressed),
            Some(InputAction::ToggleFullscreen)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyW, ElementState::Pressed),
            Some(InputAction::ToggleWave)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::Space, ElementState::Pressed),
            Some(InputAction::StartRigs)
        );
    }
}
