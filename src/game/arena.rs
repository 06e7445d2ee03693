// Training arena: rapier level geometry, dummies to hit and the knight's body

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;
use rapier2d::prelude::{nalgebra, vector};

use crate::core::Rect;
use crate::engine::physics::body::presets;
use crate::engine::physics::{
    ColliderHandle, CollisionGroups, ContactId, ContactTracker, PhysicsWorld, RapierBody,
    RigidBodyHandle,
};
use crate::game::characters::{
    AnimationPlayer, CharacterRuntime, CharacterWorld, EntityId, HitData, KnightConfig,
    KnightController,
};

/// Entity id of the knight in the arena
pub const KNIGHT_ENTITY: EntityId = 1;

const FIRST_DUMMY_ENTITY: EntityId = 100;

/// A target that soaks up hits
#[derive(Debug, Clone)]
pub struct TrainingDummy {
    pub entity: EntityId,
    pub collider: ColliderHandle,
    pub max_life: f32,
    pub life: f32,
    pub hits_taken: u32,
}

impl TrainingDummy {
    fn receive(&mut self, hit: &HitData) {
        self.hits_taken += 1;
        self.life = (self.life - hit.damage).max(0.0);
        log::info!(
            "Dummy {} took {} damage ({}/{} left)",
            self.entity,
            hit.damage,
            self.life,
            self.max_life
        );
    }

    pub fn is_broken(&self) -> bool {
        self.life <= 0.0
    }
}

/// `CharacterWorld` backed by the shared rapier world
#[derive(Clone)]
pub struct ArenaWorld {
    physics: Rc<RefCell<PhysicsWorld>>,
    knight: ColliderHandle,
    dummies: Rc<RefCell<Vec<TrainingDummy>>>,
}

impl CharacterWorld for ArenaWorld {
    fn strike(&mut self, area: Rect, hit: &HitData) -> usize {
        let targets: Vec<EntityId> = {
            let physics = self.physics.borrow();
            physics
                .intersecting_colliders(area, CollisionGroups::Hittable)
                .into_iter()
                .filter_map(|collider| physics.get_entity_id(collider))
                .filter(|entity| hit.source != Some(*entity))
                .collect()
        };

        let mut dummies = self.dummies.borrow_mut();
        let mut struck = 0;
        for dummy in dummies.iter_mut().filter(|d| targets.contains(&d.entity)) {
            dummy.receive(hit);
            struck += 1;
        }
        struck
    }

    fn any_hittable_in(&self, area: Rect) -> bool {
        !self
            .physics
            .borrow()
            .intersecting_colliders(area, CollisionGroups::Hittable)
            .is_empty()
    }

    fn is_blocked(&self, area: Rect) -> bool {
        !self
            .physics
            .borrow()
            .intersecting_colliders(area, CollisionGroups::Ground)
            .is_empty()
    }

    fn is_one_way_platform(&self, id: ContactId) -> bool {
        self.physics.borrow().is_one_way(id.to_collider())
    }

    fn set_platform_collision(&mut self, id: ContactId, enabled: bool) {
        self.physics
            .borrow_mut()
            .set_pair_ignored(self.knight, id.to_collider(), !enabled);
    }
}

/// Level geometry plus the knight's rigid body
pub struct Arena {
    physics: Rc<RefCell<PhysicsWorld>>,
    knight_body: RigidBodyHandle,
    knight_collider: ColliderHandle,
    contacts: ContactTracker,
    dummies: Rc<RefCell<Vec<TrainingDummy>>>,
    next_entity: EntityId,
}

impl Arena {
    /// Empty arena with the knight's body at `spawn`
    pub fn new(config: &KnightConfig, spawn: Vec2) -> Self {
        let mut physics = PhysicsWorld::with_gravity(vector![0.0, -30.0]);
        let knight_body = physics.add_rigid_body(presets::knight_body(spawn.x, spawn.y));
        let knight_collider =
            physics.add_collider(presets::knight_collider(config.stand_collider), knight_body);
        physics.set_entity_mapping(knight_collider, KNIGHT_ENTITY);

        Self {
            physics: Rc::new(RefCell::new(physics)),
            knight_body,
            knight_collider,
            contacts: ContactTracker::new(),
            dummies: Rc::new(RefCell::new(Vec::new())),
            next_entity: FIRST_DUMMY_ENTITY,
        }
    }

    /// Floor, two walls, a one-way ledge and a pair of dummies
    pub fn training_ground(config: &KnightConfig) -> Self {
        let mut arena = Self::new(config, Vec2::new(0.0, 1.0));
        arena.add_block(Rect::new(-20.0, -1.0, 40.0, 1.0));
        arena.add_block(Rect::new(-21.0, -1.0, 1.0, 12.0));
        arena.add_block(Rect::new(20.0, -1.0, 1.0, 12.0));
        arena.add_platform(Rect::new(-6.0, 2.5, 4.0, 0.3));
        arena.add_dummy(Vec2::new(3.0, 1.0), 60.0);
        arena.add_dummy(Vec2::new(-10.0, 1.0), 60.0);
        arena
    }

    /// Solid terrain covering `bounds`
    pub fn add_block(&mut self, bounds: Rect) -> ColliderHandle {
        let center = bounds.center();
        let mut physics = self.physics.borrow_mut();
        let body = physics.add_rigid_body(presets::terrain_body(center.x, center.y));
        physics.add_collider(presets::terrain_collider(bounds.size.x, bounds.size.y), body)
    }

    /// Ledge that can be jumped through from below and dropped from
    pub fn add_platform(&mut self, bounds: Rect) -> ColliderHandle {
        let center = bounds.center();
        let mut physics = self.physics.borrow_mut();
        let body = physics.add_rigid_body(presets::terrain_body(center.x, center.y));
        let platform =
            physics.add_collider(presets::one_way_collider(bounds.size.x, bounds.size.y), body);
        physics.mark_one_way(platform);
        platform
    }

    pub fn add_dummy(&mut self, position: Vec2, life: f32) -> EntityId {
        let entity = self.next_entity;
        self.next_entity += 1;

        let collider = {
            let mut physics = self.physics.borrow_mut();
            let body = physics.add_rigid_body(presets::terrain_body(position.x, position.y));
            let collider = physics.add_collider(presets::hittable_collider(1.0, 2.0), body);
            physics.set_entity_mapping(collider, entity);
            collider
        };

        self.dummies.borrow_mut().push(TrainingDummy {
            entity,
            collider,
            max_life: life,
            life,
            hits_taken: 0,
        });
        entity
    }

    /// World view handed to the knight
    pub fn world(&self) -> ArenaWorld {
        ArenaWorld {
            physics: Rc::clone(&self.physics),
            knight: self.knight_collider,
            dummies: Rc::clone(&self.dummies),
        }
    }

    /// Build a knight driving this arena's body
    pub fn spawn_knight(&self, config: Arc<KnightConfig>) -> KnightController {
        let body = RapierBody::new(Rc::clone(&self.physics), self.knight_body, self.knight_collider);
        let rt = CharacterRuntime::new(
            config,
            Box::new(body),
            Box::new(AnimationPlayer::with_knight_animations()),
            Box::new(self.world()),
        )
        .with_entity(KNIGHT_ENTITY);

        KnightController::with_runtime(rt)
    }

    /// Advance the simulation one fixed step and report the knight's contacts
    pub fn step(&mut self, knight: &mut KnightController) {
        let samples = {
            let mut physics = self.physics.borrow_mut();
            physics.step();
            physics.contact_samples(self.knight_collider)
        };
        for event in self.contacts.observe(samples) {
            knight.handle_contact(event);
        }
    }

    /// Forget tracked contacts, e.g. after teleporting the knight
    pub fn reset_contacts(&mut self) {
        self.contacts.clear();
    }

    pub fn dummies(&self) -> Vec<TrainingDummy> {
        self.dummies.borrow().clone()
    }

    pub fn physics(&self) -> &Rc<RefCell<PhysicsWorld>> {
        &self.physics
    }

    pub fn knight_collider(&self) -> ColliderHandle {
        self.knight_collider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::PlayerInput;
    use crate::game::characters::StateId;

    fn config() -> KnightConfig {
        KnightConfig::default()
    }

    #[test]
    fn test_strike_hits_dummies_in_area() {
        let mut arena = Arena::new(&config(), Vec2::new(-5.0, 1.0));
        let dummy = arena.add_dummy(Vec2::new(3.0, 1.0), 50.0);
        arena.physics().borrow_mut().step();

        let mut world = arena.world();
        let area = Rect::from_center(Vec2::new(3.0, 1.0), Vec2::new(1.0, 1.0));
        let hit = HitData::new(20.0, Vec2::new(4.0, 0.0)).from_source(KNIGHT_ENTITY);
        assert!(world.any_hittable_in(area));
        assert_eq!(world.strike(area, &hit), 1);

        let dummies = arena.dummies();
        assert_eq!(dummies[0].entity, dummy);
        assert_eq!(dummies[0].life, 30.0);
        assert_eq!(dummies[0].hits_taken, 1);

        let miss = Rect::from_center(Vec2::new(-3.0, 1.0), Vec2::new(1.0, 1.0));
        assert_eq!(world.strike(miss, &hit), 0);
    }

    #[test]
    fn test_dummy_life_floors_at_zero() {
        let mut arena = Arena::new(&config(), Vec2::new(-5.0, 1.0));
        arena.add_dummy(Vec2::new(0.0, 1.0), 10.0);
        arena.physics().borrow_mut().step();

        let area = Rect::from_center(Vec2::new(0.0, 1.0), Vec2::ONE);
        arena.world().strike(area, &HitData::new(25.0, Vec2::ZERO));
        assert!(arena.dummies()[0].is_broken());
        assert_eq!(arena.dummies()[0].life, 0.0);
    }

    #[test]
    fn test_platform_collision_toggles_pair() {
        let mut arena = Arena::new(&config(), Vec2::ZERO);
        let platform = arena.add_platform(Rect::new(-2.0, 2.0, 4.0, 0.3));
        let floor = arena.add_block(Rect::new(-5.0, -2.0, 10.0, 1.0));
        let mut world = arena.world();

        let id = ContactId::from_collider(platform);
        assert!(world.is_one_way_platform(id));
        assert!(!world.is_one_way_platform(ContactId::from_collider(floor)));

        world.set_platform_collision(id, false);
        assert!(arena.physics().borrow().is_pair_ignored(arena.knight_collider(), platform));
        world.set_platform_collision(id, true);
        assert!(!arena.physics().borrow().is_pair_ignored(arena.knight_collider(), platform));
    }

    #[test]
    fn test_blocked_by_terrain_only() {
        let mut arena = Arena::new(&config(), Vec2::new(-8.0, 0.0));
        arena.add_block(Rect::new(0.0, 2.0, 2.0, 1.0));
        arena.add_dummy(Vec2::new(5.0, 1.0), 10.0);
        arena.physics().borrow_mut().step();

        let world = arena.world();
        assert!(world.is_blocked(Rect::new(0.5, 2.5, 0.5, 0.5)));
        assert!(!world.is_blocked(Rect::new(4.8, 0.5, 0.4, 0.4)));
    }

    #[test]
    fn test_knight_settles_on_floor() {
        let config = config();
        let mut arena = Arena::training_ground(&config);
        let mut knight = arena.spawn_knight(Arc::new(config));
        let dt = arena.physics().borrow().timestep();
        let input = PlayerInput::new();

        for _ in 0..120 {
            knight.physics_update(dt);
            arena.step(&mut knight);
            knight.update(dt, &input);
        }

        assert!(knight.runtime().is_grounded());
        assert_eq!(knight.state(), Some(StateId::Idle));
        assert!(knight.runtime().body().position().y < 1.5);
    }
}
