use rapier2d::prelude::*;
use std::collections::HashSet;

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// The controlled knight
    Knight = 0b0000_0001,

    /// Solid terrain: floors, walls, ceilings
    Ground = 0b0000_0010,

    /// Platforms that can be passed from below and dropped through
    OneWayPlatform = 0b0000_0100,

    /// Anything an attack can hit (enemies, training dummies)
    Hittable = 0b0000_1000,
}

impl CollisionGroups {
    pub fn group(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let filter = match self {
            // The knight stands on terrain and walks through hittables
            CollisionGroups::Knight => {
                CollisionGroups::Ground.group() | CollisionGroups::OneWayPlatform.group()
            }

            CollisionGroups::Ground => CollisionGroups::Knight.group() | CollisionGroups::Hittable.group(),

            CollisionGroups::OneWayPlatform => CollisionGroups::Knight.group(),

            // Hittables accept every query; pair filtering happens on the knight side
            CollisionGroups::Hittable => Group::ALL,
        };

        InteractionGroups::new(self.group(), filter)
    }

    /// Query groups that only match colliders of this group
    pub fn query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, self.group())
    }
}

/// Pair filter and one-way platform hook plugged into the physics step
#[derive(Debug, Default)]
pub struct ContactFilter {
    ignored: HashSet<(ColliderHandle, ColliderHandle)>,
    one_way: HashSet<ColliderHandle>,
}

impl ContactFilter {
    fn key(a: ColliderHandle, b: ColliderHandle) -> (ColliderHandle, ColliderHandle) {
        if a.into_raw_parts() <= b.into_raw_parts() {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Enable or disable contacts between two colliders
    pub fn set_ignored(&mut self, a: ColliderHandle, b: ColliderHandle, ignored: bool) {
        let key = Self::key(a, b);
        if ignored {
            self.ignored.insert(key);
        } else {
            self.ignored.remove(&key);
        }
    }

    pub fn is_ignored(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.ignored.contains(&Self::key(a, b))
    }

    pub fn mark_one_way(&mut self, platform: ColliderHandle) {
        self.one_way.insert(platform);
    }

    pub fn is_one_way(&self, collider: ColliderHandle) -> bool {
        self.one_way.contains(&collider)
    }
}

impl PhysicsHooks for ContactFilter {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        if self.is_ignored(context.collider1, context.collider2) {
            None
        } else {
            Some(SolverFlags::COMPUTE_IMPULSES)
        }
    }

    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        // Only let the platform push along its own up axis
        let allowed_local_n1 = if self.is_one_way(context.collider1) {
            Vector::y()
        } else if self.is_one_way(context.collider2) {
            -Vector::y()
        } else {
            return;
        };
        context.update_as_oneway_platform(&allowed_local_n1, 0.1);
    }
}
