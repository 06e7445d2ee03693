// Crouching, standing still or walking

use glam::Vec2;

use crate::engine::input::Action;
use crate::game::characters::animation::AnimationId;
use crate::game::characters::runtime::CharacterRuntime;

use super::slots::CrouchSlot;
use super::{StateId, StateMachine, StateOps, DEFAULT_OPS};

const CROUCH_OPS: StateOps = StateOps {
    update: crouch_update,
    handle_jump: crouch_handle_jump,
    handle_dash: crouch_handle_dash,
    handle_attack: crouch_handle_attack,
    is_crouch: true,
    ..DEFAULT_OPS
};

pub(super) static CROUCH_IDLE: StateOps = StateOps {
    can_enter: crouch_idle_can_enter,
    enter: crouch_idle_enter,
    transition: crouch_idle_transition,
    physics_update: crouch_idle_physics,
    ..CROUCH_OPS
};

pub(super) static CROUCH_WALK: StateOps = StateOps {
    can_enter: crouch_walk_can_enter,
    enter: crouch_walk_enter,
    transition: crouch_walk_transition,
    physics_update: crouch_walk_physics,
    ..CROUCH_OPS
};

fn wants_crouch(rt: &CharacterRuntime) -> bool {
    (rt.pressed(Action::Crouch) || !rt.can_stand()) && rt.is_grounded()
}

fn crouch_idle_can_enter(_: &StateMachine, rt: &CharacterRuntime) -> bool {
    wants_crouch(rt) && rt.horizontal_move() == 0.0
}

fn crouch_walk_can_enter(_: &StateMachine, rt: &CharacterRuntime) -> bool {
    wants_crouch(rt) && rt.horizontal_move() != 0.0
}

/// Shared entry; coming from another crouch state skips the
/// crouch-down animation
fn crouch_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, prev: Option<StateId>, sheet: AnimationId) {
    m.slots.crouch = CrouchSlot::default();
    rt.use_crouch_collider();
    m.reset_jumps();

    if prev.is_some_and(StateId::is_crouch) {
        m.slots.crouch.swapped_animation = true;
        rt.switch_animation(sheet, false);
    } else {
        rt.switch_animation(AnimationId::CrouchTransition, true);
    }
}

fn crouch_idle_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, prev: Option<StateId>) {
    crouch_enter(m, rt, prev, AnimationId::CrouchIdle);
}

fn crouch_walk_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, prev: Option<StateId>) {
    crouch_enter(m, rt, prev, AnimationId::CrouchWalk);
}

fn crouch_update(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let transition_time = rt.config.crouch_transition_time;
    let sheet = if m.current() == StateId::CrouchWalk {
        AnimationId::CrouchWalk
    } else {
        AnimationId::CrouchIdle
    };

    let slot = &mut m.slots.crouch;
    if slot.quitting {
        slot.quitting_elapsed += dt;
    }
    slot.elapsed += dt;

    if !slot.swapped_animation && slot.elapsed > transition_time {
        slot.swapped_animation = true;
        rt.switch_animation(sheet, false);
    }

    if !slot.quitting && !rt.pressed(Action::Crouch) && rt.can_stand() {
        slot.quitting = true;
    }
}

/// Leave for the sibling state or stand up once the release has played out
fn crouch_transition(m: &mut StateMachine, rt: &mut CharacterRuntime, sibling: StateId) {
    if m.try_enter(rt, StateId::Fall) || m.try_enter(rt, sibling) {
        return;
    }
    if m.slots.crouch.quitting && m.slots.crouch.quitting_elapsed >= rt.config.crouch_transition_time {
        m.enter_state(rt, StateId::Idle);
    }
}

fn crouch_idle_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    crouch_transition(m, rt, StateId::CrouchWalk);
}

fn crouch_walk_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    crouch_transition(m, rt, StateId::CrouchIdle);
}

fn crouch_idle_physics(_: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    rt.body.slide(Vec2::ZERO, dt);
}

fn crouch_walk_physics(_: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let vx = rt.config.crouch_walk_speed * rt.horizontal_move();
    rt.body.slide(Vec2::new(vx, 0.0), dt);
    rt.flip_facing_direction(vx);
}

fn crouch_handle_jump(_: &mut StateMachine, rt: &mut CharacterRuntime) {
    if rt.try_drop_platform() {
        log::debug!("Dropping through platform");
    }
}

fn crouch_handle_dash(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.try_enter(rt, StateId::Slide);
}

fn crouch_handle_attack(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.try_enter(rt, StateId::CrouchAttack);
}
