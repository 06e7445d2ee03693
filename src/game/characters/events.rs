// Notifications the knight raises for the rest of the game

use super::combat::HitData;

/// Particle effects attached to the knight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Jump,
    Wallslide,
    Walljump,
    Landing,
    Slide,
}

/// Drained once per frame by the owner of the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnightEvent {
    Died,
    Hurt(HitData),
    /// One-shot effects only ever start
    EffectStarted(Effect),
    EffectStopped(Effect),
}
