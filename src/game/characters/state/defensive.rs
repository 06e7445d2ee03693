// Evasive moves: roll, slide and directional dash

use glam::Vec2;

use crate::core::math::{clamp, lerp, progress};
use crate::engine::input::Action;
use crate::game::characters::animation::AnimationId;
use crate::game::characters::config::KnightConfig;
use crate::game::characters::events::{Effect, KnightEvent};
use crate::game::characters::runtime::CharacterRuntime;

use super::slots::{SlideSlot, TimedSlot};
use super::{never, StateId, StateMachine, StateOps, FROZEN_OPS, LOCKED_OPS};

pub(super) static ROLL: StateOps = StateOps {
    can_enter: roll_can_enter,
    enter: roll_enter,
    update: roll_update,
    transition: roll_transition,
    physics_update: roll_physics,
    exit: roll_exit,
    is_invincible: true,
    ..LOCKED_OPS
};

fn roll_can_enter(m: &StateMachine, rt: &CharacterRuntime) -> bool {
    rt.is_grounded() && !m.is_crouch() && rt.performed(Action::Dash) && !m.roll_in_cooldown(rt)
}

fn roll_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    m.slots.roll = TimedSlot::default();
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Roll, true);
}

fn roll_update(m: &mut StateMachine, _: &mut CharacterRuntime, dt: f32) {
    m.slots.roll.elapsed += dt;
}

fn roll_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.slots.roll.elapsed > rt.config.roll_duration {
        m.enter_default_state(rt);
    } else {
        m.try_enter(rt, StateId::Fall);
    }
}

fn roll_physics(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let config = &rt.config;
    let t = progress(m.slots.roll.elapsed, config.roll_duration);
    let vx = config.roll_speed * config.roll_move_curve.evaluate(t) * rt.facing();
    rt.body.slide(Vec2::new(vx, 0.0), dt);
}

fn roll_exit(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.cooldowns.roll.start(rt.time());
}

pub(super) static SLIDE: StateOps = StateOps {
    can_enter: slide_can_enter,
    enter: slide_enter,
    update: slide_update,
    transition: slide_transition,
    physics_update: slide_physics,
    exit: slide_exit,
    is_crouch: true,
    is_invincible: true,
    ..LOCKED_OPS
};

fn slide_can_enter(m: &StateMachine, rt: &CharacterRuntime) -> bool {
    rt.is_grounded() && m.is_crouch() && rt.performed(Action::Dash) && !m.slide_in_cooldown(rt)
}

fn slide_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    m.slots.slide = SlideSlot::default();
    rt.use_crouch_collider();
    rt.switch_animation(AnimationId::Slide, true);
    rt.emit(KnightEvent::EffectStarted(Effect::Slide));
}

fn slide_update(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let slot = &mut m.slots.slide;
    slot.elapsed += dt;

    let ending_at = rt.config.slide_duration - rt.config.slide_transition_time;
    if !slot.ending && slot.elapsed > ending_at {
        slot.ending = true;
        rt.switch_animation(AnimationId::SlideEnd, false);
    }
}

fn slide_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.slots.slide.elapsed > rt.config.slide_duration {
        m.enter_state(rt, StateId::CrouchIdle);
    } else {
        m.try_enter(rt, StateId::Fall);
    }
}

fn slide_physics(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let config = &rt.config;
    let t = progress(m.slots.slide.elapsed, config.slide_duration);
    let vx = config.slide_speed * config.slide_move_curve.evaluate(t) * rt.facing();
    rt.body.slide(Vec2::new(vx, 0.0), dt);
}

fn slide_exit(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.cooldowns.slide.start(rt.time());
    rt.emit(KnightEvent::EffectStopped(Effect::Slide));
}

/// Only reachable through `StateMachine::try_enter_directional_dash`, which
/// supplies the direction
pub(super) static DIRECTIONAL_DASH: StateOps = StateOps {
    can_enter: never,
    enter: dash_enter,
    update: dash_update,
    transition: dash_transition,
    physics_update: dash_physics,
    exit: dash_exit,
    ..FROZEN_OPS
};

fn dash_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    m.slots.dash.elapsed = 0.0;
    rt.use_stand_collider();
    rt.switch_animation(AnimationId::Dash, true);
    rt.flip_to(m.slots.dash.direction);
}

fn dash_update(m: &mut StateMachine, _: &mut CharacterRuntime, dt: f32) {
    m.slots.dash.elapsed += dt;
}

fn dash_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.slots.dash.elapsed > rt.config.dash_duration {
        m.enter_default_state(rt);
    } else {
        m.try_enter(rt, StateId::Fall);
    }
}

/// Speed multiplier over the dash. Without an authored curve the dash holds
/// full speed for 80% of its duration, then falls off linearly.
fn dash_speed_multiplier(config: &KnightConfig, elapsed: f32) -> f32 {
    let t = progress(elapsed, config.dash_duration);
    match config.dash_curve.sample(t) {
        Some(value) => value,
        None if t < 0.8 => 1.0,
        None => lerp(1.0, 0.0, clamp((t - 0.8) / 0.2, 0.0, 1.0)),
    }
}

fn dash_physics(m: &mut StateMachine, rt: &mut CharacterRuntime, _: f32) {
    let dash = m.slots.dash;
    let vx = rt.config.dash_speed * dash_speed_multiplier(&rt.config, dash.elapsed) * dash.direction;
    // Vertical motion is left alone
    rt.body.set_velocity_x(vx);
}

fn dash_exit(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.cooldowns.dash.start(rt.time());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Curve, Keyframe};
    use approx::assert_relative_eq;

    #[test]
    fn test_dash_holds_speed_then_falls_off() {
        let config = KnightConfig {
            dash_duration: 1.0,
            ..KnightConfig::default()
        };
        assert_relative_eq!(dash_speed_multiplier(&config, 0.5), 1.0);
        assert_relative_eq!(dash_speed_multiplier(&config, 0.9), 0.5, epsilon = 1e-5);
        assert_relative_eq!(dash_speed_multiplier(&config, 2.0), 0.0);
    }

    #[test]
    fn test_dash_uses_authored_curve() {
        let config = KnightConfig {
            dash_duration: 1.0,
            dash_curve: Curve::new(vec![Keyframe::new(0.0, 2.0), Keyframe::new(1.0, 0.0)]),
            ..KnightConfig::default()
        };
        assert_relative_eq!(dash_speed_multiplier(&config, 0.25), 1.5);
    }
}
