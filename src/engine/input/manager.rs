// Input manager - translates device events into character actions

use super::action::{Action, InputSource};
use super::config::InputConfigManager;
use super::player::PlayerInput;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Main input manager
#[derive(Debug, Default)]
pub struct InputManager {
    /// Binding configuration
    config: InputConfigManager,

    /// Input state of the controlled character
    player: PlayerInput,
}

impl InputManager {
    /// Create a new input manager with default bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            // Key repeats are not new presses
            if event.state == ElementState::Pressed && event.repeat {
                return;
            }
            self.apply(InputSource::key(key_code), event.state);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.apply(InputSource::mouse(button), state);
    }

    /// Press a source directly (scripted input, replays)
    pub fn press_source(&mut self, source: InputSource) {
        self.apply(source, ElementState::Pressed);
    }

    /// Release a source directly
    pub fn release_source(&mut self, source: InputSource) {
        self.apply(source, ElementState::Released);
    }

    fn apply(&mut self, source: InputSource, state: ElementState) -> Option<Action> {
        let action = self.config.get_action(source)?;
        match state {
            ElementState::Pressed => self.player.press(action),
            ElementState::Released => self.player.release(action),
        }
        Some(action)
    }

    /// Update input state for a new frame
    /// Call this once per frame after the character consumed the input
    pub fn update(&mut self) {
        self.player.update();
    }

    /// Input state of the controlled character
    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    /// Get the configuration manager
    pub fn config(&self) -> &InputConfigManager {
        &self.config
    }

    /// Get mutable configuration manager
    pub fn config_mut(&mut self) -> &mut InputConfigManager {
        &mut self.config
    }

    /// Reset the input state
    pub fn reset(&mut self) {
        self.player.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputProvider;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_press_source_maps_to_action() {
        let mut manager = InputManager::new();
        manager.press_source(InputSource::key(KeyCode::ArrowLeft));

        assert!(manager.player().is_pressed(Action::MoveLeft));
        assert_eq!(manager.player().move_axis(), -1.0);
    }

    #[test]
    fn test_unbound_source_is_ignored() {
        let mut manager = InputManager::new();
        manager.press_source(InputSource::key(KeyCode::F12));

        assert_eq!(manager.player().pressed_count(), 0);
    }

    #[test]
    fn test_mouse_button_attack() {
        let mut manager = InputManager::new();
        manager.process_mouse_button(MouseButton::Left, ElementState::Pressed);

        assert!(manager.player().was_performed_this_frame(Action::Attack));
    }

    #[test]
    fn test_update_clears_performed() {
        let mut manager = InputManager::new();
        manager.press_source(InputSource::key(KeyCode::KeyX));
        manager.update();

        assert!(!manager.player().was_performed_this_frame(Action::Attack));
        assert!(manager.player().is_pressed(Action::Attack));

        manager.release_source(InputSource::key(KeyCode::KeyX));
        assert!(!manager.player().is_pressed(Action::Attack));
    }

    #[test]
    fn test_directional_dash_through_manager() {
        let mut manager = InputManager::new();
        manager.press_source(InputSource::key(KeyCode::ArrowRight));
        manager.update();
        manager.press_source(InputSource::key(KeyCode::ControlLeft));

        assert_eq!(manager.player().directional_dash(), Some(1.0));
    }

    #[test]
    fn test_reset() {
        let mut manager = InputManager::new();
        manager.press_source(InputSource::key(KeyCode::ShiftLeft));
        manager.reset();

        assert!(!manager.player().is_pressed(Action::Dash));
    }
}
