// Input state for the controlled character

use super::action::Action;
use super::provider::InputProvider;
use std::collections::HashSet;

/// Represents the input state of the local player
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed this frame
    pressed: HashSet<Action>,

    /// Actions that were just pressed this frame (press events)
    just_pressed: HashSet<Action>,

}

impl PlayerInput {
    /// Create a new player input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release. A press and release inside one frame
    /// still counts as performed.
    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Roll over to the next frame.
    /// Call this once per frame after the character consumed the input
    pub fn update(&mut self) {
        self.just_pressed.clear();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }
}

impl InputProvider for PlayerInput {
    fn is_pressed(&self, action: Action) -> bool {
        PlayerInput::is_pressed(self, action)
    }

    fn was_performed_this_frame(&self, action: Action) -> bool {
        self.just_pressed(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
        assert!(input.was_performed_this_frame(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        input.release(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
        assert!(!input.was_performed_this_frame(Action::Jump));
    }

    #[test]
    fn test_tap_within_frame_still_performed() {
        let mut input = PlayerInput::new();
        input.press(Action::Dash);
        input.release(Action::Dash);
        assert!(!input.is_pressed(Action::Dash));
        assert!(input.was_performed_this_frame(Action::Dash));
    }

    #[test]
    fn test_performed_cleared_on_update() {
        let mut input = PlayerInput::new();
        input.press(Action::Attack);
        input.update();
        assert!(input.is_pressed(Action::Attack));
        assert!(!input.was_performed_this_frame(Action::Attack));
    }

    #[test]
    fn test_reset() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.press(Action::Attack);
        input.reset();

        assert!(!input.is_pressed(Action::Jump));
        assert_eq!(input.pressed_count(), 0);
    }

    #[test]
    fn test_move_axis_from_provider() {
        let mut input = PlayerInput::new();
        input.press(Action::MoveRight);
        assert_eq!(input.move_axis(), 1.0);

        input.release(Action::MoveRight);
        input.press(Action::MoveLeft);
        assert_eq!(input.move_axis(), -1.0);
    }

    #[test]
    fn test_multiple_presses_same_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.press(Action::Jump);

        assert_eq!(input.pressed_count(), 1);
    }
}
