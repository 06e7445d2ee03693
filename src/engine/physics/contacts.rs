use glam::Vec2;
use rapier2d::prelude::ColliderHandle;
use std::collections::{HashMap, HashSet};

/// Minimum `normal.y` for a contact to count as ground
pub const GROUND_NORMAL_THRESHOLD: f32 = 0.7;

/// Minimum `|normal.x|` for a contact to count as a wall
pub const WALL_NORMAL_THRESHOLD: f32 = 0.7;

/// Identity of the other collider in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub u64);

impl ContactId {
    pub fn from_collider(handle: ColliderHandle) -> Self {
        let (index, generation) = handle.into_raw_parts();
        Self(((generation as u64) << 32) | index as u64)
    }

    pub fn to_collider(self) -> ColliderHandle {
        ColliderHandle::from_raw_parts(self.0 as u32, (self.0 >> 32) as u32)
    }
}

/// Contact notification delivered to a character.
///
/// `normal` points from the other surface toward the character, so standing
/// on flat ground reports `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    Enter { id: ContactId, normal: Vec2 },
    Stay { id: ContactId, normal: Vec2 },
    Exit { id: ContactId },
}

/// Turns per-step contact samples into enter/stay/exit events
#[derive(Debug, Default)]
pub struct ContactTracker {
    active: HashSet<ContactId>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff this step's samples against the previous step
    pub fn observe(
        &mut self,
        samples: impl IntoIterator<Item = (ContactId, Vec2)>,
    ) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        let mut current = HashSet::new();

        for (id, normal) in samples {
            if !current.insert(id) {
                continue;
            }
            if self.active.contains(&id) {
                events.push(ContactEvent::Stay { id, normal });
            } else {
                events.push(ContactEvent::Enter { id, normal });
            }
        }

        let mut ended: Vec<_> = self.active.difference(&current).copied().collect();
        ended.sort();
        events.extend(ended.into_iter().map(|id| ContactEvent::Exit { id }));

        self.active = current;
        events
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Tracks the contacts touching a character and derives ground and wall flags
#[derive(Debug, Default)]
pub struct CollisionChecker {
    contacts: HashMap<ContactId, Vec2>,
    grounded: bool,
    wall_left: bool,
    wall_right: bool,
}

impl CollisionChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: ContactEvent) {
        match event {
            ContactEvent::Enter { id, normal } | ContactEvent::Stay { id, normal } => {
                self.contacts.insert(id, normal);
            }
            ContactEvent::Exit { id } => {
                self.contacts.remove(&id);
            }
        }
    }

    /// Recompute the derived flags. Called once per physics tick.
    pub fn evaluate(&mut self) {
        self.grounded = false;
        self.wall_left = false;
        self.wall_right = false;

        for normal in self.contacts.values() {
            if normal.y >= GROUND_NORMAL_THRESHOLD {
                self.grounded = true;
            }
            // A wall on the right pushes back toward -x
            if normal.x <= -WALL_NORMAL_THRESHOLD {
                self.wall_right = true;
            }
            if normal.x >= WALL_NORMAL_THRESHOLD {
                self.wall_left = true;
            }
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether a wall blocks movement toward the sign of `direction`
    pub fn colliding_in_wall(&self, direction: f32) -> bool {
        if direction > 0.0 {
            self.wall_right
        } else if direction < 0.0 {
            self.wall_left
        } else {
            false
        }
    }

    pub fn contacts(&self) -> impl Iterator<Item = ContactId> + '_ {
        self.contacts.keys().copied()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
        self.evaluate();
    }
}
