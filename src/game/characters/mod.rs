// Knight character
//
// - `state`: the state machine and every knight state
// - `runtime`: body, senses, life and deferred tasks shared by the states
// - `character`: `KnightController`, the entry point driven by the game loop
// - `config`: tuning values loaded from RON
// - `animation`, `combat`, `events`, `save`: seams to the rest of the game

pub mod animation;
pub mod attribute;
pub mod character;
pub mod combat;
pub mod config;
pub mod events;
pub mod invincibility;
pub mod runtime;
pub mod save;
pub mod state;
pub mod tasks;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use animation::{AnimationClip, AnimationFrameData, AnimationId, AnimationPlayer, SheetAnimator};
pub use attribute::{AttributeData, CharacterAttribute};
pub use character::KnightController;
pub use combat::{CharacterWorld, EntityId, HitData};
pub use config::{AttackDefinition, ConfigError, KnightConfig};
pub use events::{Effect, KnightEvent};
pub use runtime::CharacterRuntime;
pub use save::{KnightSaveData, SceneTransition, SpawnPoint};
pub use state::{StateId, StateMachine};
