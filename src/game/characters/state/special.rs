// Scripted and damage states: bootstrap, hurt, death and scene-entry walk

use glam::Vec2;

use crate::game::characters::animation::AnimationId;
use crate::game::characters::events::KnightEvent;
use crate::game::characters::runtime::CharacterRuntime;

use super::slots::HurtSlot;
use super::{StateId, StateMachine, StateOps, FROZEN_OPS};

/// Placeholder the machine starts in before its first real state
pub(super) static VALIDATION: StateOps = FROZEN_OPS;

pub(super) static HURT: StateOps = StateOps {
    enter: hurt_enter,
    update: hurt_update,
    transition: hurt_transition,
    is_invincible: true,
    ..FROZEN_OPS
};

fn hurt_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    let hit = m.slots.hurt.hit;
    m.slots.hurt = HurtSlot { elapsed: 0.0, hit };

    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Hurt, false);
    rt.body.set_velocity(Vec2::ZERO);
    if let Some(hit) = hit {
        rt.body.add_impulse(hit.knockback);
    }
}

fn hurt_update(m: &mut StateMachine, _: &mut CharacterRuntime, dt: f32) {
    m.slots.hurt.elapsed += dt;
}

fn hurt_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.slots.hurt.elapsed > rt.config.hurt_time {
        m.enter_default_state(rt);
    }
}

/// Terminal: nothing leaves Die except a fresh machine
pub(super) static DIE: StateOps = StateOps {
    enter: die_enter,
    is_invincible: true,
    ..FROZEN_OPS
};

fn die_enter(_: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    rt.switch_animation(AnimationId::Die, true);
    rt.use_crouch_collider();
    rt.body.set_velocity(Vec2::ZERO);
    rt.emit(KnightEvent::Died);
    log::info!("Knight died at {:?}", rt.body.position());
}

pub(super) static FAKE_WALK: StateOps = StateOps {
    enter: fake_walk_enter,
    update: fake_walk_update,
    physics_update: fake_walk_physics,
    transition: fake_walk_transition,
    is_invincible: true,
    ..FROZEN_OPS
};

fn fake_walk_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    m.slots.fake_walk.elapsed = 0.0;
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Run, false);
}

fn fake_walk_update(m: &mut StateMachine, _: &mut CharacterRuntime, dt: f32) {
    m.slots.fake_walk.elapsed += dt;
}

fn fake_walk_physics(_: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let vx = rt.facing() * rt.config.move_speed;
    rt.body.slide(Vec2::new(vx, 0.0), dt);
}

fn fake_walk_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.try_enter(rt, StateId::Fall) {
        return;
    }
    if m.slots.fake_walk.elapsed > m.slots.fake_walk.duration {
        m.enter_default_state(rt);
    }
}
