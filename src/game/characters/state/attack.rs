// Ground attacks: the two-step combo, crouch attack and thrust

use crate::core::math::axis_sign;
use crate::core::Rect;
use crate::engine::input::Action;
use crate::game::characters::animation::AnimationId;
use crate::game::characters::config::{AttackDefinition, KnightConfig};
use crate::game::characters::runtime::CharacterRuntime;

use super::slots::{AttackSlot, ExitCommand};
use super::{StateId, StateMachine, StateOps, LOCKED_OPS};

const ATTACK_OPS: StateOps = StateOps {
    enter: attack_enter,
    update: attack_update,
    transition: attack_transition,
    exit: attack_exit,
    ..LOCKED_OPS
};

pub(super) static FIRST_ATTACK: StateOps = ATTACK_OPS;

pub(super) static SECOND_ATTACK: StateOps = ATTACK_OPS;

pub(super) static CROUCH_ATTACK: StateOps = StateOps {
    is_crouch: true,
    ..ATTACK_OPS
};

pub(super) static THRUST_ATTACK: StateOps = ATTACK_OPS;

/// Attack data of a ground attack state
fn definition(config: &KnightConfig, id: StateId) -> AttackDefinition {
    match id {
        StateId::SecondAttack => config.second_attack,
        StateId::CrouchAttack => config.crouch_attack,
        StateId::ThrustAttack => config
            .first_attack
            .scaled(config.thrust_damage_multiplier, config.thrust_knockback_multiplier),
        _ => config.first_attack,
    }
}

fn collider(config: &KnightConfig, id: StateId) -> Rect {
    if id == StateId::CrouchAttack {
        config.crouch_collider
    } else {
        config.stand_collider
    }
}

fn sheet(id: StateId) -> AnimationId {
    match id {
        StateId::SecondAttack => AnimationId::SecondAttack,
        StateId::CrouchAttack => AnimationId::CrouchAttack,
        _ => AnimationId::FirstAttack,
    }
}

/// Where a follow-up attack press leads; the thrust does not chain
fn chain_target(id: StateId) -> Option<StateId> {
    match id {
        StateId::FirstAttack => Some(StateId::SecondAttack),
        StateId::SecondAttack => Some(StateId::FirstAttack),
        StateId::CrouchAttack => Some(StateId::CrouchAttack),
        _ => None,
    }
}

fn attack_enter(m: &mut StateMachine, rt: &mut CharacterRuntime, _: Option<StateId>) {
    let id = m.current();
    m.slots.attack = AttackSlot::default();
    let bounds = collider(&rt.config, id);
    rt.set_collider_bounds(bounds);
    rt.switch_animation(sheet(id), true);
    rt.body.set_velocity_x(0.0);
}

fn attack_update(m: &mut StateMachine, rt: &mut CharacterRuntime, dt: f32) {
    let attack = definition(&rt.config, m.current());
    let slot = &mut m.slots.attack;
    slot.elapsed += dt;

    if rt.performed(Action::Dash) {
        slot.exit_command = if rt.pressed(Action::Crouch) || !rt.can_stand() {
            ExitCommand::Slide
        } else {
            ExitCommand::Roll
        };
    }

    if !slot.triggered && slot.elapsed >= attack.trigger_time {
        slot.triggered = true;
        rt.perform_attack(&attack);
    }
}

fn attack_transition(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    if m.try_enter(rt, StateId::Fall) {
        return;
    }

    let id = m.current();
    let attack = definition(&rt.config, id);
    let slot = m.slots.attack;
    if slot.elapsed < attack.active_end() {
        return;
    }

    // A buffered dash wins once the active window is over
    match slot.exit_command {
        ExitCommand::Roll if !m.roll_in_cooldown(rt) => {
            m.enter_state(rt, StateId::Roll);
            return;
        }
        ExitCommand::Slide if !m.slide_in_cooldown(rt) => {
            m.enter_state(rt, StateId::Slide);
            return;
        }
        _ => {}
    }

    if let Some(next) = chain_target(id).filter(|_| rt.performed(Action::Attack)) {
        let crouching = rt.pressed(Action::Crouch);
        let next = if next.is_crouch() && !crouching && rt.can_stand() {
            StateId::FirstAttack
        } else if !next.is_crouch() && crouching {
            StateId::CrouchAttack
        } else {
            next
        };
        m.enter_state(rt, next);
    } else if slot.elapsed > attack.duration {
        m.enter_default_state(rt);
    }
}

fn attack_exit(_: &mut StateMachine, rt: &mut CharacterRuntime) {
    let axis = axis_sign(rt.horizontal_move());
    if axis != 0 {
        rt.flip_to(axis as f32);
    }
}
