// Knight states.
//
// Each state is a row of plain functions in a `StateOps` table. Rows start
// from `DEFAULT_OPS` and override only what the state changes.

mod aerial;
mod attack;
mod crouch;
mod defensive;
mod locomotion;
pub mod machine;
pub mod slots;
mod special;

pub use machine::{AirComboPool, ComboCounter, JumpPool, ResourcePools, StateMachine, MAX_AIR_ATTACKS};
pub use slots::{Cooldown, ExitCommand, StateSlots};

use super::runtime::CharacterRuntime;

/// Every state the knight can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Validation,
    Idle,
    Run,
    Jump,
    Fall,
    Roll,
    CrouchIdle,
    CrouchWalk,
    Slide,
    Wallslide,
    Walljump,
    FirstAttack,
    SecondAttack,
    CrouchAttack,
    ThrustAttack,
    AirFirstAttack,
    AirSecondAttack,
    DownwardStrike,
    FallAttack,
    Hurt,
    Die,
    FakeWalk,
    DirectionalDash,
}

impl StateId {
    pub const ALL: [StateId; 23] = [
        Self::Validation,
        Self::Idle,
        Self::Run,
        Self::Jump,
        Self::Fall,
        Self::Roll,
        Self::CrouchIdle,
        Self::CrouchWalk,
        Self::Slide,
        Self::Wallslide,
        Self::Walljump,
        Self::FirstAttack,
        Self::SecondAttack,
        Self::CrouchAttack,
        Self::ThrustAttack,
        Self::AirFirstAttack,
        Self::AirSecondAttack,
        Self::DownwardStrike,
        Self::FallAttack,
        Self::Hurt,
        Self::Die,
        Self::FakeWalk,
        Self::DirectionalDash,
    ];

    /// Operation table of this state
    pub fn ops(self) -> &'static StateOps {
        match self {
            Self::Validation => &special::VALIDATION,
            Self::Idle => &locomotion::IDLE,
            Self::Run => &locomotion::RUN,
            Self::Jump => &locomotion::JUMP,
            Self::Fall => &locomotion::FALL,
            Self::Roll => &defensive::ROLL,
            Self::CrouchIdle => &crouch::CROUCH_IDLE,
            Self::CrouchWalk => &crouch::CROUCH_WALK,
            Self::Slide => &defensive::SLIDE,
            Self::Wallslide => &locomotion::WALLSLIDE,
            Self::Walljump => &locomotion::WALLJUMP,
            Self::FirstAttack => &attack::FIRST_ATTACK,
            Self::SecondAttack => &attack::SECOND_ATTACK,
            Self::CrouchAttack => &attack::CROUCH_ATTACK,
            Self::ThrustAttack => &attack::THRUST_ATTACK,
            Self::AirFirstAttack => &aerial::AIR_FIRST_ATTACK,
            Self::AirSecondAttack => &aerial::AIR_SECOND_ATTACK,
            Self::DownwardStrike => &aerial::DOWNWARD_STRIKE,
            Self::FallAttack => &aerial::FALL_ATTACK,
            Self::Hurt => &special::HURT,
            Self::Die => &special::DIE,
            Self::FakeWalk => &special::FAKE_WALK,
            Self::DirectionalDash => &defensive::DIRECTIONAL_DASH,
        }
    }

    pub fn is_crouch(self) -> bool {
        self.ops().is_crouch
    }

    pub fn is_invincible(self) -> bool {
        self.ops().is_invincible
    }

    pub fn is_airborne_attack(self) -> bool {
        matches!(
            self,
            Self::AirFirstAttack | Self::AirSecondAttack | Self::DownwardStrike | Self::FallAttack
        )
    }
}

pub type CanEnterFn = fn(&StateMachine, &CharacterRuntime) -> bool;
pub type EnterFn = fn(&mut StateMachine, &mut CharacterRuntime, Option<StateId>);
pub type TickFn = fn(&mut StateMachine, &mut CharacterRuntime, f32);
pub type HookFn = fn(&mut StateMachine, &mut CharacterRuntime);

/// Behavior of one state
#[derive(Clone, Copy)]
pub struct StateOps {
    pub can_enter: CanEnterFn,
    /// Receives the state being left
    pub enter: EnterFn,
    /// Frame tick, before `transition`
    pub update: TickFn,
    /// Fixed physics tick
    pub physics_update: TickFn,
    pub transition: HookFn,
    pub exit: HookFn,
    pub handle_jump: HookFn,
    pub handle_dash: HookFn,
    pub handle_attack: HookFn,
    pub handle_heavy_attack: HookFn,
    /// Receives the dash direction (-1 or 1)
    pub handle_directional_dash: TickFn,
    pub is_crouch: bool,
    pub is_invincible: bool,
}

fn always(_: &StateMachine, _: &CharacterRuntime) -> bool {
    true
}

pub(crate) fn never(_: &StateMachine, _: &CharacterRuntime) -> bool {
    false
}

fn no_enter(_: &mut StateMachine, _: &mut CharacterRuntime, _: Option<StateId>) {}

fn no_tick(_: &mut StateMachine, _: &mut CharacterRuntime, _: f32) {}

pub(crate) fn no_hook(_: &mut StateMachine, _: &mut CharacterRuntime) {}

fn default_jump(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.try_enter(rt, StateId::Jump);
}

fn default_dash(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.try_enter(rt, StateId::Roll);
}

fn default_attack(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.try_enter_attack_state(rt);
}

fn default_heavy_attack(m: &mut StateMachine, rt: &mut CharacterRuntime) {
    m.try_enter_heavy_attack_state(rt);
}

fn default_directional_dash(m: &mut StateMachine, rt: &mut CharacterRuntime, direction: f32) {
    m.try_enter_directional_dash(rt, direction);
}

/// Fallback row: enterable, inert, and routing every input to its usual
/// entry point
pub const DEFAULT_OPS: StateOps = StateOps {
    can_enter: always,
    enter: no_enter,
    update: no_tick,
    physics_update: no_tick,
    transition: no_hook,
    exit: no_hook,
    handle_jump: default_jump,
    handle_dash: default_dash,
    handle_attack: default_attack,
    handle_heavy_attack: default_heavy_attack,
    handle_directional_dash: default_directional_dash,
    is_crouch: false,
    is_invincible: false,
};

/// Like `DEFAULT_OPS`, but jump, dash and both attacks are ignored
pub const LOCKED_OPS: StateOps = StateOps {
    handle_jump: no_hook,
    handle_dash: no_hook,
    handle_attack: no_hook,
    handle_heavy_attack: no_hook,
    ..DEFAULT_OPS
};

/// Like `LOCKED_OPS`, with directional dash ignored as well
pub const FROZEN_OPS: StateOps = StateOps {
    handle_directional_dash: no_tick,
    ..LOCKED_OPS
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invincible_states() {
        let invincible: Vec<_> = StateId::ALL.into_iter().filter(|s| s.is_invincible()).collect();
        assert_eq!(
            invincible,
            vec![
                StateId::Roll,
                StateId::Slide,
                StateId::Hurt,
                StateId::Die,
                StateId::FakeWalk
            ]
        );
    }

    #[test]
    fn test_crouch_states() {
        let crouch: Vec<_> = StateId::ALL.into_iter().filter(|s| s.is_crouch()).collect();
        assert_eq!(
            crouch,
            vec![
                StateId::CrouchIdle,
                StateId::CrouchWalk,
                StateId::Slide,
                StateId::CrouchAttack
            ]
        );
    }

    #[test]
    fn test_airborne_attacks() {
        assert!(StateId::DownwardStrike.is_airborne_attack());
        assert!(!StateId::ThrustAttack.is_airborne_attack());
    }
}
