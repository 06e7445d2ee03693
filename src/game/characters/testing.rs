// Test doubles for driving a knight without a physics backend

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;

use crate::core::Rect;
use crate::engine::input::{Action, PlayerInput};
use crate::engine::physics::{ContactEvent, ContactId, PhysicsBody};

use super::animation::{AnimationId, SheetAnimator};
use super::character::KnightController;
use super::combat::{CharacterWorld, HitData};
use super::config::KnightConfig;
use super::state::StateId;

pub const GROUND: ContactId = ContactId(1);
pub const WALL: ContactId = ContactId(2);
pub const PLATFORM: ContactId = ContactId(3);

pub const DT: f32 = 1.0 / 60.0;

#[derive(Debug)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub gravity: Vec2,
    pub collider: Option<Rect>,
    pub collider_changes: u32,
    pub impulses: Vec<Vec2>,
}

/// Point-mass body; shares its state with the test through `Rc`
#[derive(Debug, Clone)]
pub struct MockBody(pub Rc<RefCell<BodyState>>);

impl MockBody {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(BodyState {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            gravity: Vec2::new(0.0, -30.0),
            collider: None,
            collider_changes: 0,
            impulses: Vec::new(),
        })))
    }

    /// Apply gravity and velocity for one step; `supported` stops downward
    /// motion the way the floor would
    pub fn integrate(&self, dt: f32, supported: bool) {
        let mut state = self.0.borrow_mut();
        let pull = state.gravity * state.gravity_scale * dt;
        state.velocity += pull;
        if supported && state.velocity.y < 0.0 {
            state.velocity.y = 0.0;
        }
        let step = state.velocity * dt;
        state.position += step;
    }

    pub fn position(&self) -> Vec2 {
        self.0.borrow().position
    }

    pub fn velocity(&self) -> Vec2 {
        self.0.borrow().velocity
    }

    pub fn set_velocity(&self, velocity: Vec2) {
        self.0.borrow_mut().velocity = velocity;
    }

    pub fn gravity_scale(&self) -> f32 {
        self.0.borrow().gravity_scale
    }

    pub fn collider_changes(&self) -> u32 {
        self.0.borrow().collider_changes
    }
}

impl PhysicsBody for MockBody {
    fn position(&self) -> Vec2 {
        self.0.borrow().position
    }

    fn set_position(&mut self, position: Vec2) {
        self.0.borrow_mut().position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.0.borrow().velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.0.borrow_mut().velocity = velocity;
    }

    fn gravity_scale(&self) -> f32 {
        self.0.borrow().gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.0.borrow_mut().gravity_scale = scale;
    }

    fn gravity(&self) -> Vec2 {
        self.0.borrow().gravity
    }

    fn add_impulse(&mut self, impulse: Vec2) {
        let mut state = self.0.borrow_mut();
        state.velocity += impulse;
        state.impulses.push(impulse);
    }

    fn slide(&mut self, velocity: Vec2, dt: f32) {
        let mut state = self.0.borrow_mut();
        state.position += velocity * dt;
        state.velocity.x = 0.0;
        if velocity.y != 0.0 {
            state.velocity.y = 0.0;
        }
    }

    fn set_collider(&mut self, bounds: Rect) {
        let mut state = self.0.borrow_mut();
        state.collider = Some(bounds);
        state.collider_changes += 1;
    }
}

#[derive(Debug, Default)]
pub struct WorldState {
    pub hittables: Vec<Rect>,
    pub solids: Vec<Rect>,
    pub one_way: HashSet<ContactId>,
    pub disabled: HashSet<ContactId>,
    pub strikes: Vec<(Rect, HitData)>,
}

/// Level made of plain rectangles
#[derive(Debug, Clone, Default)]
pub struct MockWorld(pub Rc<RefCell<WorldState>>);

impl MockWorld {
    pub fn add_hittable(&self, area: Rect) {
        self.0.borrow_mut().hittables.push(area);
    }

    pub fn add_solid(&self, area: Rect) {
        self.0.borrow_mut().solids.push(area);
    }

    pub fn add_one_way(&self, id: ContactId) {
        self.0.borrow_mut().one_way.insert(id);
    }

    pub fn strikes(&self) -> Vec<(Rect, HitData)> {
        self.0.borrow().strikes.clone()
    }

    pub fn is_disabled(&self, id: ContactId) -> bool {
        self.0.borrow().disabled.contains(&id)
    }
}

impl CharacterWorld for MockWorld {
    fn strike(&mut self, area: Rect, hit: &HitData) -> usize {
        let mut state = self.0.borrow_mut();
        state.strikes.push((area, *hit));
        state.hittables.iter().filter(|h| h.overlaps(&area)).count()
    }

    fn any_hittable_in(&self, area: Rect) -> bool {
        self.0.borrow().hittables.iter().any(|h| h.overlaps(&area))
    }

    fn is_blocked(&self, area: Rect) -> bool {
        self.0.borrow().solids.iter().any(|s| s.overlaps(&area))
    }

    fn is_one_way_platform(&self, id: ContactId) -> bool {
        self.0.borrow().one_way.contains(&id)
    }

    fn set_platform_collision(&mut self, id: ContactId, enabled: bool) {
        let mut state = self.0.borrow_mut();
        if enabled {
            state.disabled.remove(&id);
        } else {
            state.disabled.insert(id);
        }
    }
}

#[derive(Debug, Default)]
pub struct AnimatorState {
    pub sheets: Vec<AnimationId>,
    pub alphas: Vec<f32>,
    pub flipped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator(pub Rc<RefCell<AnimatorState>>);

impl RecordingAnimator {
    pub fn sheets(&self) -> Vec<AnimationId> {
        self.0.borrow().sheets.clone()
    }

    pub fn last_alpha(&self) -> Option<f32> {
        self.0.borrow().alphas.last().copied()
    }

    pub fn alphas(&self) -> Vec<f32> {
        self.0.borrow().alphas.clone()
    }
}

impl SheetAnimator for RecordingAnimator {
    fn set_sheet(&mut self, id: AnimationId) {
        self.0.borrow_mut().sheets.push(id);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.0.borrow_mut().alphas.push(alpha);
    }

    fn set_flip_horizontal(&mut self, flip: bool) {
        self.0.borrow_mut().flipped = flip;
    }
}

/// A knight on flat ground with scripted input
pub struct Harness {
    pub knight: KnightController,
    pub input: PlayerInput,
    pub body: MockBody,
    pub world: MockWorld,
    pub animator: RecordingAnimator,
    grounded: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(KnightConfig::default())
    }

    pub fn with_config(config: KnightConfig) -> Self {
        let body = MockBody::new();
        let world = MockWorld::default();
        let animator = RecordingAnimator::default();
        let mut knight = KnightController::new(
            Arc::new(config),
            Box::new(body.clone()),
            Box::new(animator.clone()),
            Box::new(world.clone()),
        );
        knight.handle_contact(ContactEvent::Enter {
            id: GROUND,
            normal: Vec2::Y,
        });

        Self {
            knight,
            input: PlayerInput::new(),
            body,
            world,
            animator,
            grounded: true,
        }
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
        let event = if grounded {
            ContactEvent::Enter {
                id: GROUND,
                normal: Vec2::Y,
            }
        } else {
            ContactEvent::Exit { id: GROUND }
        };
        self.knight.handle_contact(event);
    }

    /// Wall on the side given by the sign of `side`; zero removes it
    pub fn set_wall(&mut self, side: f32) {
        let event = if side == 0.0 {
            ContactEvent::Exit { id: WALL }
        } else {
            ContactEvent::Enter {
                id: WALL,
                normal: Vec2::new(-side.signum(), 0.0),
            }
        };
        self.knight.handle_contact(event);
    }

    /// One physics step then one frame; input edges are cleared afterwards
    pub fn step(&mut self) {
        self.knight.physics_update(DT);
        self.body.integrate(DT, self.grounded);
        self.knight.update(DT, &self.input);
        self.input.update();
    }

    pub fn run(&mut self, seconds: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            self.step();
        }
    }

    /// Press and release within a single frame
    pub fn tap(&mut self, action: Action) {
        self.input.press(action);
        self.step();
        self.input.release(action);
    }

    pub fn hold(&mut self, action: Action) {
        self.input.press(action);
    }

    pub fn release(&mut self, action: Action) {
        self.input.release(action);
    }

    pub fn state(&self) -> Option<StateId> {
        self.knight.state()
    }
}
