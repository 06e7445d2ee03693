// Everything a knight state can touch besides the state machine itself

use std::mem;
use std::sync::Arc;

use glam::Vec2;

use crate::core::Rect;
use crate::engine::input::{Action, InputFrame, InputProvider};
use crate::engine::physics::{CollisionChecker, ContactId, PhysicsBody};

use super::animation::{AnimationId, SheetAnimator};
use super::attribute::CharacterAttribute;
use super::combat::{CharacterWorld, EntityId, HitData};
use super::config::{AttackDefinition, KnightConfig};
use super::events::KnightEvent;
use super::invincibility::Invincibility;
use super::tasks::{ScheduledTask, TaskHost, TaskList};

/// Body, senses and bookkeeping of one knight.
///
/// States receive this next to the `StateMachine`; the two are kept apart so
/// a state can borrow both mutably at once.
pub struct CharacterRuntime {
    pub(crate) config: Arc<KnightConfig>,
    pub(crate) body: Box<dyn PhysicsBody>,
    animator: Box<dyn SheetAnimator>,
    pub(crate) world: Box<dyn CharacterWorld>,
    pub(crate) collisions: CollisionChecker,
    input: InputFrame,
    life: CharacterAttribute<f32>,
    invincibility: Invincibility,
    tasks: TaskList,
    facing: f32,
    can_stand: bool,
    animation: Option<AnimationId>,
    collider: Option<Rect>,
    events: Vec<KnightEvent>,
    time: f64,
    entity: EntityId,
}

impl CharacterRuntime {
    pub fn new(
        config: Arc<KnightConfig>,
        body: Box<dyn PhysicsBody>,
        animator: Box<dyn SheetAnimator>,
        world: Box<dyn CharacterWorld>,
    ) -> Self {
        let life = CharacterAttribute::linear(config.life);
        Self {
            config,
            body,
            animator,
            world,
            collisions: CollisionChecker::new(),
            input: InputFrame::default(),
            life,
            invincibility: Invincibility::new(),
            tasks: TaskList::new(),
            facing: 1.0,
            can_stand: true,
            animation: None,
            collider: None,
            events: Vec::new(),
            time: 0.0,
            entity: 0,
        }
    }

    /// Identity used as the source of outgoing hits
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = entity;
        self
    }

    pub fn config(&self) -> &KnightConfig {
        &self.config
    }

    pub fn body(&self) -> &dyn PhysicsBody {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> &mut dyn PhysicsBody {
        self.body.as_mut()
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Seconds accumulated over frame ticks
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 1 when facing right, -1 when facing left
    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// False while something solid sits over the crouching head
    pub fn can_stand(&self) -> bool {
        self.can_stand
    }

    pub fn input(&self) -> &InputFrame {
        &self.input
    }

    pub fn horizontal_move(&self) -> f32 {
        self.input.move_axis()
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.input.is_pressed(action)
    }

    pub fn performed(&self, action: Action) -> bool {
        self.input.was_performed_this_frame(action)
    }

    pub fn is_grounded(&self) -> bool {
        self.collisions.is_grounded()
    }

    pub fn colliding_in_wall(&self, direction: f32) -> bool {
        self.collisions.colliding_in_wall(direction)
    }

    pub fn collisions(&self) -> &CollisionChecker {
        &self.collisions
    }

    pub fn current_animation(&self) -> Option<AnimationId> {
        self.animation
    }

    pub fn current_collider(&self) -> Option<Rect> {
        self.collider
    }

    pub fn flip(&mut self) {
        self.facing = -self.facing;
        self.animator.set_flip_horizontal(self.facing < 0.0);
    }

    /// Face the sign of `direction`; zero keeps the current facing
    pub fn flip_to(&mut self, direction: f32) {
        if (direction > 0.0 && self.facing < 0.0) || (direction < 0.0 && self.facing > 0.0) {
            self.flip();
        }
    }

    /// Turn around when moving against the facing direction
    pub fn flip_facing_direction(&mut self, velocity_x: f32) {
        self.flip_to(velocity_x);
    }

    /// Switch the sprite sheet. Re-requesting the current sheet is ignored
    /// unless `force` restarts it.
    pub fn switch_animation(&mut self, id: AnimationId, force: bool) {
        if !force && self.animation == Some(id) {
            return;
        }
        self.animation = Some(id);
        self.animator.set_sheet(id);
    }

    /// Resize the collider; same bounds are a no-op
    pub fn set_collider_bounds(&mut self, bounds: Rect) {
        if self.collider == Some(bounds) {
            return;
        }
        self.collider = Some(bounds);
        self.body.set_collider(bounds);
    }

    pub fn use_stand_collider(&mut self) {
        let bounds = self.config.stand_collider;
        self.set_collider_bounds(bounds);
    }

    pub fn use_crouch_collider(&mut self) {
        let bounds = self.config.crouch_collider;
        self.set_collider_bounds(bounds);
    }

    /// Grant invincibility for `duration` seconds, flickering if `animate`
    pub fn grant_invincibility(&mut self, duration: f32, animate: bool) {
        if self.invincibility.grant(animate) {
            self.tasks.schedule(ScheduledTask::Flicker {
                elapsed: 0.0,
                fade_speed: self.config.invincibility_fade_speed,
                alpha_change: self.config.invincibility_alpha_change,
            });
        }
        self.tasks.schedule(ScheduledTask::EndInvincibility {
            remaining: duration,
            animate,
        });
    }

    pub fn is_invincible_by_grant(&self) -> bool {
        self.invincibility.is_active()
    }

    pub fn invincibility(&self) -> &Invincibility {
        &self.invincibility
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Lunge forward by the attack's offset and strike its hitbox.
    /// Returns how many targets were hit.
    pub fn perform_attack(&mut self, attack: &AttackDefinition) -> usize {
        self.lunge(attack.horizontal_move_offset);
        let area = attack.hitbox.to_world(self.body.position(), self.facing);
        self.perform_attack_in(area, attack)
    }

    /// Step `offset` units toward the facing direction, stopping at walls
    pub fn lunge(&mut self, offset: f32) {
        self.body.slide(Vec2::new(offset * self.facing, 0.0), 1.0);
    }

    /// Strike a world-space area with the attack's damage and knockback
    pub fn perform_attack_in(&mut self, area: Rect, attack: &AttackDefinition) -> usize {
        let hit = HitData::new(
            attack.damage as f32,
            Vec2::new(attack.knockback_force * self.facing, 0.0),
        )
        .from_source(self.entity);
        let struck = self.world.strike(area, &hit);
        log::trace!("Attack struck {struck} target(s) in {area:?}");
        struck
    }

    /// Fall through every one-way platform underfoot for a short while
    pub fn try_drop_platform(&mut self) -> bool {
        let platforms: Vec<ContactId> = self
            .collisions
            .contacts()
            .filter(|id| self.world.is_one_way_platform(*id))
            .collect();

        for platform in &platforms {
            self.world.set_platform_collision(*platform, false);
            self.tasks.schedule(ScheduledTask::RestorePlatformCollision {
                remaining: self.config.platform_drop_time,
                platform: *platform,
            });
        }
        !platforms.is_empty()
    }

    pub fn emit(&mut self, event: KnightEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<KnightEvent> {
        mem::take(&mut self.events)
    }

    pub fn life(&self) -> &CharacterAttribute<f32> {
        &self.life
    }

    pub fn life_mut(&mut self) -> &mut CharacterAttribute<f32> {
        &mut self.life
    }

    /// Start a frame tick: latch input, advance clocks and deferred tasks
    pub fn begin_frame(&mut self, dt: f32, input: &impl InputProvider) {
        self.input = InputFrame::capture(input);
        self.time += f64::from(dt);

        let mut tasks = mem::take(&mut self.tasks);
        tasks.advance(dt, self);
        // Tasks scheduled while the list was detached
        tasks.append(&mut self.tasks);
        self.tasks = tasks;

        self.animator.advance(dt);
    }

    /// Refresh contact flags and head clearance before the physics tick
    pub fn refresh_physics(&mut self) {
        self.collisions.evaluate();
        let head = self
            .config
            .crouch_head_rect
            .to_world(self.body.position(), self.facing);
        self.can_stand = !self.world.is_blocked(head);
    }
}

impl TaskHost for CharacterRuntime {
    fn end_invincibility(&mut self, animate: bool) {
        self.invincibility.release(animate);
    }

    fn is_flickering(&self) -> bool {
        self.invincibility.is_animating()
    }

    fn flicker_finished(&mut self) {
        self.invincibility.stop_flicker();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.animator.set_alpha(alpha);
    }

    fn restore_platform(&mut self, platform: ContactId) {
        self.world.set_platform_collision(platform, true);
    }
}
