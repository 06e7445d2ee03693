// Input handling system
//
// Translates keyboard and mouse events into game actions and exposes them to
// character controllers through the `InputProvider` trait.
//
// ## Architecture
//
// - `action`: Defines game actions and default key bindings
// - `player`: Pressed / just-pressed state for the controlled character
// - `provider`: `InputProvider` seam and the per-frame `InputFrame` snapshot
// - `config`: Input configuration and remapping system
// - `manager`: Main input manager coordinating everything
//
// ## Usage Example
//
// ```rust
// use rusted_knight::engine::input::{InputManager, InputProvider, Action};
//
// let mut input = InputManager::new();
//
// // In your event loop, process keyboard events
// input.process_keyboard_event(&key_event);
//
// // Feed the character, then roll the frame over
// knight.update(dt, input.player());
// input.update();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;
pub mod provider;

// Re-export commonly used types
pub use action::{Action, InputSource};
pub use config::{InputConfig, InputConfigManager};
pub use manager::InputManager;
pub use player::PlayerInput;
pub use provider::{ActionSet, InputFrame, InputProvider};
