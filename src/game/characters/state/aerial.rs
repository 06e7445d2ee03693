// Airborne attacks: the hovering air combo, downward strike and fall attack

use std::sync::Arc;

use glam::Vec2;

use crate::core::Rect;
use crate::engine::input::Action;
use crate::game::characters::animation::AnimationId;
use crate::game::characters::config::{AttackDefinition, KnightConfig};
use crate::game::characters::events::{Effect, KnightEvent};
use crate::game::characters::runtime::CharacterRuntime;

use super::slots::{AirAttackSlot, DownwardStrikeSlot, FallAttackSlot};
use super::{StateId, StateMachine, StateOps, LOCKED_OPS};

const AIR_ATTACK_OPS: StateOps = StateOps {
    can_enter: air_attack_can_enter,
    enter: air_attack_enter,
    update: air_attack_update,
    physics_update: air_attack_physics,
    transition: air_attack_transition,
    exit: air_attack_exit,
    ..LOCKED_OPS
};

pub(super) static AIR_FIRST_ATTACK: StateOps = AIR_ATTACK_OPS;

pub(super) static AIR_SECOND_ATTACK: StateOps = AIR_ATTACK_OPS;

fn air_attack(config: &KnightConfig, id: StateId) -> AttackDefinition {
    if id == StateId::AirSecondAttack {
        config.air_second_attack
    } else {
        config.air_first_attack
    }
}

fn restore_gravity(_: &mut StateMachine, rt: &mut CharacterRuntime) {
    rt.body.set_gravity_scale(1.0);
}

/// Leaving the swing for anything but the next chained attack closes the combo
fn air_attack_exit(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    restore_gravity(m, rt);
    let chained = matches!(
        m.current(),
        StateId::AirSecondAttack | StateId::DownwardStrike
    );
    if !chained {
        m.end_air_combo();
    }
}

fn air_attack_can_enter(m: &StateMachine, rt: &CharacterRuntime) -> bool {
    !rt.is_grounded() && m.is_in_air_combo()
}

fn air_attack_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    let sheet = if m.current() == StateId::AirSecondAttack {
        AnimationId::SecondAttack
    } else {
        AnimationId::FirstAttack
    };
    rt.use_stand_collider();
    rt.switch_animation(sheet, false);

    // Hang in the air while drifting a fixed distance forward
    let config = &rt.config;
    m.slots.air_attack = AirAttackSlot {
        hovering: true,
        start_x: rt.body.position().x,
        move_speed: config.air_attack_forward_distance / config.air_attack_hover_duration.max(f32::EPSILON),
        ..AirAttackSlot::default()
    };
    let hover_gravity = config.air_attack_hover_gravity;
    rt.body.set_gravity_scale(hover_gravity);
    rt.body.set_velocity_y(0.0);
}

fn air_attack_update(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let attack = air_attack(&rt.config, m.current());
    let slot = &mut m.slots.air_attack;
    slot.elapsed += dt;

    if !slot.triggered && slot.elapsed >= attack.trigger_time {
        slot.triggered = true;
        rt.perform_attack(&attack);
    }
}

fn air_attack_physics(m: &mut StateMachine, rt: &mut CharacterRuntime, _: f32) {
    let hover_duration = rt.config.air_attack_hover_duration;
    let distance = rt.config.air_attack_forward_distance;
    let slot = &mut m.slots.air_attack;

    if slot.hovering && slot.elapsed < hover_duration {
        let facing = rt.facing();
        let travelled = (rt.body.position().x - slot.start_x).abs();
        let vx = if travelled < distance && !rt.colliding_in_wall(facing) {
            slot.move_speed * facing
        } else {
            0.0
        };
        rt.body.set_velocity(Vec2::new(vx, 0.0));
    } else {
        slot.hovering = false;
        rt.body.set_gravity_scale(1.0);

        let axis = rt.horizontal_move();
        if !rt.colliding_in_wall(axis) {
            let vx = rt.config.air_move_speed * axis;
            rt.body.set_velocity_x(vx);
        }
    }
    rt.flip_facing_direction(rt.horizontal_move());
}

fn air_attack_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if rt.is_grounded() {
        m.on_grounded_landing();
        m.enter_default_state(rt);
        return;
    }

    let hover_duration = rt.config.air_attack_hover_duration;
    let elapsed = m.slots.air_attack.elapsed;
    if elapsed <= hover_duration {
        return;
    }

    let since_hover = elapsed - hover_duration;
    let attacked = rt.performed(Action::Attack);
    match m.current() {
        StateId::AirFirstAttack => {
            let window = rt.config.air_combo_window;
            if attacked && since_hover <= window {
                m.advance_air_combo(rt, StateId::AirSecondAttack);
            } else if since_hover > window {
                log::debug!("Air combo window closed");
                m.end_air_combo();
                m.enter_state(rt, StateId::Fall);
            }
        }
        // The second swing waits for the strike input or the ground
        _ if attacked => m.advance_air_combo(rt, StateId::DownwardStrike),
        _ => {}
    }
}

pub(super) static DOWNWARD_STRIKE: StateOps = StateOps {
    can_enter: air_attack_can_enter,
    enter: strike_enter,
    update: strike_update,
    physics_update: strike_physics,
    transition: strike_transition,
    exit: strike_exit,
    ..LOCKED_OPS
};

fn strike_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    m.slots.downward_strike = DownwardStrikeSlot::default();
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::FirstAttack, false);
    // Brief hover before diving
    rt.body.set_gravity_scale(0.0);
    rt.body.set_velocity_y(0.0);
}

fn strike_update(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let config = &rt.config;
    let hover_time = config.downward_strike_hover_time;
    let attack = config
        .air_downward_strike
        .scaled(config.downward_strike_damage_multiplier, 1.0);

    let slot = &mut m.slots.downward_strike;
    slot.elapsed += dt;

    if !slot.accelerating && slot.elapsed >= hover_time {
        slot.accelerating = true;
        rt.body.set_gravity_scale(1.0);
    }

    if !slot.triggered && slot.elapsed >= attack.trigger_time {
        slot.triggered = true;
        rt.perform_attack(&attack);
    }
}

fn strike_physics(m: &mut StateMachine, rt: &mut CharacterRuntime, _: f32) {
    if m.slots.downward_strike.accelerating {
        let speed = rt.config.downward_strike_acceleration;
        rt.body.set_velocity(Vec2::new(0.0, -speed));
    }
}

fn strike_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if rt.is_grounded() {
        m.on_grounded_landing();
        rt.emit(KnightEvent::EffectStarted(Effect::Landing));
        m.enter_default_state(rt);
    }
}

fn strike_exit(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.end_air_combo();
    rt.body.set_gravity_scale(1.0);
}

pub(super) static FALL_ATTACK: StateOps = StateOps {
    can_enter: fall_attack_can_enter,
    enter: fall_attack_enter,
    update: fall_attack_update,
    physics_update: fall_attack_physics,
    transition: fall_attack_transition,
    exit: restore_gravity,
    ..LOCKED_OPS
};

fn fall_attack_can_enter(_: &StateMachine, rt: &CharacterRuntime) -> bool {
    !rt.is_grounded()
}

fn fall_attack_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::FirstAttack, false);
    m.slots.fall_attack = FallAttackSlot {
        start_y: rt.body.position().y,
        ..FallAttackSlot::default()
    };

    let initial_speed = rt.config.fall_attack_initial_speed;
    let gravity_scale = rt.config.fall_attack_gravity_scale;
    let vy = rt.body.velocity().y.min(-initial_speed);
    rt.body.set_velocity_y(vy);
    rt.body.set_gravity_scale(gravity_scale);
}

fn fall_attack_update(m: &mut StateMachine, _: &mut CharacterRuntime, dt: f32) {
    m.slots.fall_attack.elapsed += dt;
}

/// Damage multiplier earned by falling from `start_y`
fn fall_multiplier(config: &KnightConfig, start_y: f32, y: f32) -> Option<f32> {
    (start_y - y >= config.minimum_fall_height).then_some(config.fall_attack_damage_multiplier)
}

fn fall_attack_physics(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let config = Arc::clone(&rt.config);

    let axis = rt.horizontal_move();
    if !rt.colliding_in_wall(axis) {
        rt.body
            .set_velocity_x(config.air_move_speed * config.fall_attack_air_control * axis);
    }
    let vy = rt.body.velocity().y - config.fall_attack_acceleration * dt;
    rt.body.set_velocity_y(vy);
    rt.flip_facing_direction(axis);

    // Strike the first target met on the way down, at reduced power
    let slot = &mut m.slots.fall_attack;
    if slot.hit_mid_air {
        return;
    }
    let position = rt.body.position();
    let area = Rect::from_center(position, config.fall_attack_scan_size);
    if !rt.world.any_hittable_in(area) {
        return;
    }

    let multiplier = fall_multiplier(&config, slot.start_y, position.y)
        .map_or(config.fall_attack_mid_air_multiplier, |earned| {
            earned * config.fall_attack_mid_air_multiplier
        });
    let attack = config
        .fall_attack
        .scaled(multiplier, config.fall_attack_mid_air_knockback);
    rt.lunge(attack.horizontal_move_offset * 0.5);
    rt.perform_attack_in(area, &attack);
    slot.hit_mid_air = true;

    let bounced = rt.body.velocity().y.max(config.fall_attack_bounce_speed);
    rt.body.set_velocity_y(bounced);
}

fn fall_attack_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    let config = Arc::clone(&rt.config);
    let slot = m.slots.fall_attack;

    if rt.is_grounded() {
        let y = rt.body.position().y;
        let earned = fall_multiplier(&config, slot.start_y, y);
        if !slot.hit_mid_air && !slot.landing_done {
            let multiplier = earned.unwrap_or(1.0);
            let attack = config.fall_attack.scaled(multiplier, multiplier);
            rt.perform_attack(&attack);
            m.slots.fall_attack.landing_done = true;
        }

        m.on_grounded_landing();
        if earned.is_some() {
            rt.emit(KnightEvent::EffectStarted(Effect::Landing));
        }
        m.enter_default_state(rt);
    } else if slot.elapsed > config.fall_attack.duration {
        m.enter_state(rt, StateId::Fall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fall_multiplier_needs_minimum_height() {
        let config = KnightConfig::default();
        assert_eq!(fall_multiplier(&config, 10.0, 9.0), None);
        let earned = fall_multiplier(&config, 10.0, 10.0 - config.minimum_fall_height);
        assert_relative_eq!(earned.unwrap_or_default(), config.fall_attack_damage_multiplier);
    }

    #[test]
    fn test_air_attack_definitions() {
        let config = KnightConfig::default();
        assert_eq!(air_attack(&config, StateId::AirFirstAttack), config.air_first_attack);
        assert_eq!(air_attack(&config, StateId::AirSecondAttack), config.air_second_attack);
    }
}
