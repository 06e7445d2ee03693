// Ground and air movement: idle, run, jump, fall, wall slide and wall jump

use glam::Vec2;

use crate::core::math::axis_sign;
use crate::engine::input::Action;
use crate::game::characters::animation::AnimationId;
use crate::game::characters::events::{Effect, KnightEvent};
use crate::game::characters::runtime::CharacterRuntime;

use super::{no_hook, StateId, StateMachine, StateOps, DEFAULT_OPS, LOCKED_OPS};

pub(super) static IDLE: StateOps = StateOps {
    enter: idle_enter,
    transition: idle_transition,
    physics_update: idle_physics,
    ..DEFAULT_OPS
};

fn idle_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Idle, false);
    m.reset_jumps();
}

fn idle_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.try_enter(rt, StateId::Fall)
        || m.try_enter(rt, StateId::CrouchIdle)
        || m.try_enter(rt, StateId::CrouchWalk)
    {
        return;
    }
    if rt.horizontal_move() != 0.0 {
        m.try_enter(rt, StateId::Run);
    }
}

fn idle_physics(_: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    rt.body.slide(Vec2::ZERO, dt);
}

pub(super) static RUN: StateOps = StateOps {
    can_enter: run_can_enter,
    enter: run_enter,
    transition: run_transition,
    physics_update: run_physics,
    ..DEFAULT_OPS
};

fn run_can_enter(_: &StateMachine, rt: &CharacterRuntime) -> bool {
    let axis = rt.horizontal_move();
    axis != 0.0 && rt.is_grounded() && !rt.colliding_in_wall(axis)
}

fn run_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Run, false);
    m.reset_jumps();
}

fn run_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.try_enter(rt, StateId::Fall)
        || m.try_enter(rt, StateId::CrouchIdle)
        || m.try_enter(rt, StateId::CrouchWalk)
    {
        return;
    }
    if rt.horizontal_move() == 0.0 || rt.colliding_in_wall(rt.horizontal_move()) {
        m.enter_state(rt, StateId::Idle);
    }
}

fn run_physics(_: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let vx = rt.config.move_speed * rt.horizontal_move();
    rt.body.slide(Vec2::new(vx, 0.0), dt);
    rt.flip_facing_direction(vx);
}

pub(super) static JUMP: StateOps = StateOps {
    can_enter: jump_can_enter,
    enter: jump_enter,
    update: jump_update,
    physics_update: jump_physics,
    transition: jump_transition,
    handle_jump: no_hook,
    ..DEFAULT_OPS
};

fn jump_can_enter(m: &StateMachine, rt: &CharacterRuntime) -> bool {
    if !rt.pressed(Action::Jump) || m.jumps_remaining() == 0 {
        return false;
    }
    if rt.is_grounded() {
        rt.can_stand()
    } else {
        rt.config().enable_double_jump
    }
}

fn jump_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Jump, false);
    rt.emit(KnightEvent::EffectStarted(Effect::Jump));

    m.try_consume_jump();
    let height = if rt.is_grounded() {
        rt.config.jump_height
    } else {
        rt.config.double_jump_height
    };
    rt.body.set_velocity_y(height);
    m.slots.jump.jump_held = true;
}

fn jump_update(m: &mut StateMachine, rt: &mut CharacterRuntime, _: f32) {
    m.slots.jump.jump_held = rt.pressed(Action::Jump);
}

fn jump_physics(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    // Releasing the button early cuts the jump short
    if !m.slots.jump.jump_held {
        let boost = (rt.config.jump_low_multiplier - 1.0) * rt.body.gravity().y * dt;
        let vy = rt.body.velocity().y + boost;
        rt.body.set_velocity_y(vy);
    }
    air_control(rt);
}

fn jump_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if rt.body.velocity().y < 0.0 {
        m.enter_default_state(rt);
    }
}

pub(super) static FALL: StateOps = StateOps {
    can_enter: fall_can_enter,
    enter: fall_enter,
    transition: fall_transition,
    physics_update: fall_physics,
    handle_jump: fall_handle_jump,
    handle_attack: fall_handle_attack,
    ..DEFAULT_OPS
};

fn fall_can_enter(_: &StateMachine, rt: &CharacterRuntime) -> bool {
    !rt.is_grounded()
}

fn fall_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Fall, false);
    m.slots.fall.start_y = rt.body.position().y;
}

fn fall_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if rt.is_grounded() {
        let fallen = m.slots.fall.start_y - rt.body.position().y;
        if fallen > rt.config.fall_particles_distance {
            rt.emit(KnightEvent::EffectStarted(Effect::Landing));
        }
        m.on_grounded_landing();
        m.enter_default_state(rt);
        return;
    }
    m.try_enter(rt, StateId::Wallslide);
}

fn fall_physics(_: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let boost = (rt.config.jump_fall_multiplier - 1.0) * rt.body.gravity().y * dt;
    let vy = rt.body.velocity().y + boost;
    rt.body.set_velocity_y(vy);
    air_control(rt);
}

fn fall_handle_jump(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if rt.config.enable_double_jump && m.jumps_remaining() > 0 {
        m.try_enter(rt, StateId::Jump);
    }
}

fn fall_handle_attack(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if rt.config.enable_aerial_combat && rt.performed(Action::Attack) {
        m.try_enter_aerial_attack_state(rt);
    }
}

/// Horizontal steering shared by the airborne states
fn air_control(rt: &mut CharacterRuntime) {
    let axis = rt.horizontal_move();
    let vx = if rt.colliding_in_wall(axis) {
        0.0
    } else {
        rt.config.air_move_speed * axis
    };
    rt.body.set_velocity_x(vx);
    rt.flip_facing_direction(vx);
}

pub(super) static WALLSLIDE: StateOps = StateOps {
    can_enter: wallslide_can_enter,
    enter: wallslide_enter,
    transition: wallslide_transition,
    physics_update: wallslide_physics,
    exit: wallslide_exit,
    handle_jump: wallslide_handle_jump,
    ..LOCKED_OPS
};

fn wallslide_can_enter(_: &StateMachine, rt: &CharacterRuntime) -> bool {
    let axis = rt.horizontal_move();
    !rt.is_grounded() && rt.colliding_in_wall(axis) && axis_sign(axis) as f32 == rt.facing()
}

fn wallslide_enter(_: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Wallslide, false);
    rt.emit(KnightEvent::EffectStarted(Effect::Wallslide));
    rt.body.set_velocity_x(0.0);
}

fn wallslide_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if !wallslide_can_enter(m, rt) {
        m.enter_default_state(rt);
    }
}

fn wallslide_physics(_: &mut StateMachine, rt: &mut CharacterRuntime, _: f32) {
    let speed = rt.config.wall_slide_speed;
    rt.body.set_velocity_y(-speed);
}

fn wallslide_exit(_: &mut StateMachine, rt: &mut CharacterRuntime) {
    rt.emit(KnightEvent::EffectStopped(Effect::Wallslide));
}

fn wallslide_handle_jump(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.try_enter(rt, StateId::Walljump);
}

pub(super) static WALLJUMP: StateOps = StateOps {
    enter: walljump_enter,
    update: walljump_update,
    transition: walljump_transition,
    ..LOCKED_OPS
};

fn walljump_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    m.slots.walljump.elapsed = 0.0;
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Jump, false);
    // Push off away from the wall
    rt.flip();
    rt.emit(KnightEvent::EffectStarted(Effect::Walljump));

    m.reset_jumps();
    m.try_consume_jump();
    let force = rt.config.wall_jump_force;
    let facing = rt.facing();
    rt.body.set_velocity(Vec2::new(force.x * facing, force.y));
}

fn walljump_update(m: &mut StateMachine, _: &mut CharacterRuntime, dt: f32) {
    m.slots.walljump.elapsed += dt;
}

fn walljump_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.slots.walljump.elapsed > rt.config.wall_jump_duration {
        m.enter_default_state(rt);
    }
}
