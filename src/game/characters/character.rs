// Knight controller: drives the state machine from frame and physics ticks

use std::sync::Arc;

use glam::Vec2;

use crate::engine::input::{Action, InputProvider};
use crate::engine::physics::{Color, ContactEvent, DebugDraw, PhysicsBody};

use super::animation::SheetAnimator;
use super::combat::{CharacterWorld, HitData};
use super::config::KnightConfig;
use super::events::KnightEvent;
use super::runtime::CharacterRuntime;
use super::save::{KnightSaveData, SceneTransition};
use super::state::{StateId, StateMachine};

pub const ATTACK_GIZMO_COLOR: Color = [1.0, 0.2, 0.2, 0.8];
pub const HEAD_GIZMO_COLOR: Color = [1.0, 0.9, 0.1, 0.8];

/// The playable knight.
///
/// The owner calls `update` once per rendered frame and `physics_update`
/// once per fixed step, feeding contact events in between.
pub struct KnightController {
    rt: CharacterRuntime,
    machine: Option<StateMachine>,
}

impl KnightController {
    pub fn new(
        config: Arc<KnightConfig>,
        body: Box<dyn PhysicsBody>,
        animator: Box<dyn SheetAnimator>,
        world: Box<dyn CharacterWorld>,
    ) -> Self {
        Self::with_runtime(CharacterRuntime::new(config, body, animator, world))
    }

    /// Wrap a runtime and build its state machine right away
    pub fn with_runtime(rt: CharacterRuntime) -> Self {
        let mut controller = Self::from_runtime(rt);
        controller.bootstrap();
        controller
    }

    /// Wrap a runtime without a state machine; one is built on the first tick
    pub fn from_runtime(rt: CharacterRuntime) -> Self {
        Self { rt, machine: None }
    }

    fn bootstrap(&mut self) {
        self.machine = Some(StateMachine::new(&mut self.rt));
    }

    /// Build the machine if it is missing
    fn ensure_machine(&mut self) {
        if self.machine.is_none() {
            log::warn!("Knight has no state machine, bootstrapping one");
            self.bootstrap();
        }
    }

    /// Frame tick: tasks, input handlers, then the active state
    pub fn update(&mut self, dt: f32, input: &impl InputProvider) {
        self.rt.begin_frame(dt, input);
        self.ensure_machine();
        let Some(machine) = self.machine.as_mut() else {
            return;
        };
        let rt = &mut self.rt;

        if rt.performed(Action::Jump) {
            machine.handle_jump(rt);
        }
        if rt.performed(Action::Dash) {
            machine.handle_dash(rt);
        }
        if rt.performed(Action::Attack) {
            machine.handle_attack(rt);
        }
        if rt.performed(Action::HeavyAttack) {
            machine.handle_heavy_attack(rt);
        }

        machine.update(rt, dt);

        if rt.config().enable_directional_dash {
            if let Some(direction) = rt.input().directional_dash() {
                machine.handle_directional_dash(rt, direction);
            }
        }
    }

    /// Fixed tick: contact flags and head clearance, then the active state
    pub fn physics_update(&mut self, dt: f32) {
        self.rt.refresh_physics();
        self.ensure_machine();
        if let Some(machine) = self.machine.as_mut() {
            machine.physics_update(&mut self.rt, dt);
        }
    }

    pub fn handle_contact(&mut self, event: ContactEvent) {
        self.rt.collisions.handle(event);
    }

    /// Damage entry point. Returns whether the hit landed.
    pub fn take_hit(&mut self, hit: HitData) -> bool {
        if self.is_invincible() || self.is_dead() {
            return false;
        }

        let life = self.rt.life().current_value() - hit.damage;
        self.rt.life_mut().set_current_value(life);
        self.rt.emit(KnightEvent::Hurt(hit));

        let invincibility_time = self.rt.config().default_invincibility_time;
        self.ensure_machine();
        let Some(machine) = self.machine.as_mut() else {
            return true;
        };
        let rt = &mut self.rt;
        if life <= 0.0 {
            machine.enter_state(rt, StateId::Die);
        } else {
            rt.grant_invincibility(invincibility_time, true);
            machine.enter_hurt(rt, hit);
        }
        true
    }

    /// Fields persisted across the scene change
    pub fn before_unload(&self) -> KnightSaveData {
        KnightSaveData {
            life: self.rt.life().current_value(),
            died: self.is_dead(),
        }
    }

    /// Place the knight in a new scene and restore its saved state
    pub fn on_scene_transition(&mut self, transition: &SceneTransition) {
        let spawn = transition.spawn;
        self.rt.body.set_position(spawn.position);
        self.rt.body.set_velocity(Vec2::ZERO);
        self.rt.body.set_gravity_scale(1.0);
        self.rt.flip_to(spawn.facing());
        self.rt.collisions.clear();

        // The saved life comes back as is; the fresh machine clears the death
        self.rt.life_mut().set_current_value(transition.save.life);
        if transition.save.died {
            log::info!("Knight respawned after dying");
        }

        self.bootstrap();
        if spawn.horizontal_door {
            let duration = self.rt.config().fake_walk_on_scene_transition_time;
            if let Some(machine) = self.machine.as_mut() {
                machine.enter_fake_walk(&mut self.rt, duration);
            }
        }

        log::info!(
            "Knight entered scene at {:?} with {} life",
            spawn.position,
            self.rt.life().current_value()
        );
    }

    /// Wire shapes for the attack hitboxes and the crouch head check
    pub fn debug_gizmos(&self, draw: &mut DebugDraw) {
        let position = self.rt.body.position();
        let facing = self.rt.facing();
        let config = self.rt.config();

        draw.set_color(ATTACK_GIZMO_COLOR);
        for (_, attack) in config.attacks() {
            draw.wire_rect(attack.hitbox.to_world(position, facing));
        }
        draw.set_color(HEAD_GIZMO_COLOR)
            .wire_rect(config.crouch_head_rect.to_world(position, facing));
    }

    pub fn state(&self) -> Option<StateId> {
        self.machine.as_ref().map(StateMachine::current)
    }

    pub fn is_dead(&self) -> bool {
        self.state() == Some(StateId::Die)
    }

    /// Granted invincibility or an invincible state
    pub fn is_invincible(&self) -> bool {
        self.rt.is_invincible_by_grant() || self.state().is_some_and(StateId::is_invincible)
    }

    pub fn drain_events(&mut self) -> Vec<KnightEvent> {
        self.rt.drain_events()
    }

    pub fn runtime(&self) -> &CharacterRuntime {
        &self.rt
    }

    pub fn runtime_mut(&mut self) -> &mut CharacterRuntime {
        &mut self.rt
    }

    pub fn machine(&self) -> Option<&StateMachine> {
        self.machine.as_ref()
    }
}
