// Hits dealt and received by the knight, and the world queries behind them

use glam::Vec2;

use crate::core::Rect;
use crate::engine::physics::ContactId;

/// Entity identifier shared with the arena
pub type EntityId = u64;

/// One hit travelling between entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitData {
    pub damage: f32,
    /// Impulse applied to the receiver
    pub knockback: Vec2,
    pub source: Option<EntityId>,
}

impl HitData {
    pub fn new(damage: f32, knockback: Vec2) -> Self {
        Self {
            damage,
            knockback,
            source: None,
        }
    }

    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

/// The knight's view of the level: hit resolution and blocking queries.
///
/// Areas are world-space rectangles.
pub trait CharacterWorld {
    /// Deliver `hit` to every hittable target in `area`; returns how many
    /// were struck
    fn strike(&mut self, area: Rect, hit: &HitData) -> usize;

    fn any_hittable_in(&self, area: Rect) -> bool;

    /// Whether solid ground geometry overlaps `area`
    fn is_blocked(&self, area: Rect) -> bool;

    fn is_one_way_platform(&self, id: ContactId) -> bool;

    /// Enable or disable collision between the knight and a platform
    fn set_platform_collision(&mut self, id: ContactId, enabled: bool);
}
