// Game action definitions and mappings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Crouch,
    Jump,

    // Evasion
    Dash,
    /// Held modifier that turns a horizontal direction into a directional dash
    DashModifier,

    // Combat
    Attack,
    HeavyAttack,

    // Meta actions
    Pause,
}

impl Action {
    /// Every action, in bit order
    pub const ALL: [Action; 9] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Crouch,
        Action::Jump,
        Action::Dash,
        Action::DashModifier,
        Action::Attack,
        Action::HeavyAttack,
        Action::Pause,
    ];

    /// Bit used by `ActionSet`
    pub(crate) const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings for the knight
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        // Movement (arrows, with WASD mirrors)
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
        (InputSource::key(KeyCode::ArrowDown), Action::Crouch),
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::KeyS), Action::Crouch),
        (InputSource::key(KeyCode::Space), Action::Jump),
        // Evasion
        (InputSource::key(KeyCode::ShiftLeft), Action::Dash),
        (InputSource::key(KeyCode::ControlLeft), Action::DashModifier),
        // Combat
        (InputSource::key(KeyCode::KeyX), Action::Attack),
        (InputSource::key(KeyCode::KeyV), Action::HeavyAttack),
        (InputSource::mouse(MouseButton::Left), Action::Attack),
        (InputSource::mouse(MouseButton::Right), Action::HeavyAttack),
    ]
}

/// Global bindings (not tied to the controlled character)
pub fn global_bindings() -> Vec<(InputSource, Action)> {
    vec![(InputSource::key(KeyCode::Escape), Action::Pause)]
}
