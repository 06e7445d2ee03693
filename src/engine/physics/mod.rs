// Physics system using rapier2d

pub mod body;
mod collision;
mod contacts;
mod debug;
mod world;

pub use body::{PhysicsBody, RapierBody};
pub use collision::{CollisionGroups, ContactFilter};
pub use contacts::{CollisionChecker, ContactEvent, ContactId, ContactTracker};
pub use debug::{Color, DebugDraw, DebugLine};
pub use world::{DebugData, PhysicsWorld};

// Re-export commonly used rapier types for convenience
pub use rapier2d::prelude::{ColliderHandle, Real, RigidBodyHandle, Vector};
