// Input provider seam between the input system and character controllers

use super::action::Action;

/// Compact set of actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// Read-only view of the input devices, queried by action
pub trait InputProvider {
    /// Whether the action is currently held
    fn is_pressed(&self, action: Action) -> bool;

    /// Whether the action went down during the current frame
    fn was_performed_this_frame(&self, action: Action) -> bool;

    /// Horizontal axis in [-1, 1]
    fn move_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_pressed(Action::MoveLeft) {
            axis -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            axis += 1.0;
        }
        axis
    }

    /// Direction of a directional dash requested this frame.
    ///
    /// The modifier must go down this frame while a horizontal direction is
    /// held; left wins when both are held.
    fn directional_dash(&self) -> Option<f32> {
        if !self.was_performed_this_frame(Action::DashModifier) {
            return None;
        }
        if self.is_pressed(Action::MoveLeft) {
            Some(-1.0)
        } else if self.is_pressed(Action::MoveRight) {
            Some(1.0)
        } else {
            None
        }
    }
}

/// Snapshot of an `InputProvider` taken once per frame tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub pressed: ActionSet,
    pub performed: ActionSet,
    pub move_axis: f32,
    pub directional_dash: Option<f32>,
}

impl InputFrame {
    /// Capture the current state of a provider
    pub fn capture(provider: &impl InputProvider) -> Self {
        let mut frame = Self::default();
        for action in Action::ALL {
            if provider.is_pressed(action) {
                frame.pressed.insert(action);
            }
            if provider.was_performed_this_frame(action) {
                frame.performed.insert(action);
            }
        }
        frame.move_axis = provider.move_axis();
        frame.directional_dash = provider.directional_dash();
        frame
    }
}

impl InputProvider for InputFrame {
    fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(action)
    }

    fn was_performed_this_frame(&self, action: Action) -> bool {
        self.performed.contains(action)
    }

    fn move_axis(&self) -> f32 {
        self.move_axis
    }

    fn directional_dash(&self) -> Option<f32> {
        self.directional_dash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Held(ActionSet, ActionSet);

    impl InputProvider for Held {
        fn is_pressed(&self, action: Action) -> bool {
            self.0.contains(action)
        }

        fn was_performed_this_frame(&self, action: Action) -> bool {
            self.1.contains(action)
        }
    }

    #[test]
    fn test_action_set_insert_remove() {
        let mut set = ActionSet::EMPTY;
        set.insert(Action::Jump);
        set.insert(Action::Attack);
        assert!(set.contains(Action::Jump));
        set.remove(Action::Jump);
        assert!(!set.contains(Action::Jump));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Action::Attack]);
    }

    #[test]
    fn test_move_axis_cancels_out() {
        let both = Held(
            [Action::MoveLeft, Action::MoveRight].into_iter().collect(),
            ActionSet::EMPTY,
        );
        assert_eq!(both.move_axis(), 0.0);

        let left = Held([Action::MoveLeft].into_iter().collect(), ActionSet::EMPTY);
        assert_eq!(left.move_axis(), -1.0);
    }

    #[test]
    fn test_directional_dash_requires_modifier_edge() {
        let held_only = Held(
            [Action::DashModifier, Action::MoveRight].into_iter().collect(),
            ActionSet::EMPTY,
        );
        assert_eq!(held_only.directional_dash(), None);

        let edge = Held(
            [Action::DashModifier, Action::MoveRight].into_iter().collect(),
            [Action::DashModifier].into_iter().collect(),
        );
        assert_eq!(edge.directional_dash(), Some(1.0));

        let no_direction = Held(
            [Action::DashModifier].into_iter().collect(),
            [Action::DashModifier].into_iter().collect(),
        );
        assert_eq!(no_direction.directional_dash(), None);
    }

    #[test]
    fn test_frame_capture_matches_provider() {
        let source = Held(
            [Action::MoveLeft, Action::Crouch].into_iter().collect(),
            [Action::Attack].into_iter().collect(),
        );
        let frame = InputFrame::capture(&source);
        assert!(frame.is_pressed(Action::Crouch));
        assert!(frame.was_performed_this_frame(Action::Attack));
        assert!(!frame.was_performed_this_frame(Action::Jump));
        assert_eq!(frame.move_axis(), -1.0);
    }
}
