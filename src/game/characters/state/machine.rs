// Knight state machine: current state, per-state slots and shared resources

use crate::engine::input::Action;
use crate::game::characters::combat::HitData;
use crate::game::characters::runtime::CharacterRuntime;

use super::slots::{Cooldowns, StateSlots};
use super::StateId;

/// Air attacks available per combo (two swings and the downward strike)
pub const MAX_AIR_ATTACKS: u32 = 3;

/// Jump charges, replenished on landing and on wall jumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpPool {
    consumed: u32,
    max: u32,
}

impl JumpPool {
    pub fn new(max: u32) -> Self {
        Self { consumed: 0, max }
    }

    pub fn reset(&mut self) {
        self.consumed = 0;
    }

    /// Use one charge; fails without side effects when none are left
    pub fn try_consume(&mut self) -> bool {
        if self.consumed < self.max {
            self.consumed += 1;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> u32 {
        self.max - self.consumed
    }

    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

/// Progress through the aerial combo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AirComboPool {
    count: u32,
    active: bool,
}

impl AirComboPool {
    pub fn start(&mut self) {
        self.count = 1;
        self.active = true;
    }

    pub fn advance(&mut self) {
        self.count = (self.count + 1).min(MAX_AIR_ATTACKS);
    }

    /// Close the combo but keep the count, so it cannot restart until landing
    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.active = false;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Counters shared by every state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePools {
    pub jumps: JumpPool,
    pub air_combo: AirComboPool,
}

impl ResourcePools {
    pub fn new(max_jumps: u32) -> Self {
        Self {
            jumps: JumpPool::new(max_jumps),
            air_combo: AirComboPool::default(),
        }
    }
}

/// Alternates the two ground attacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboCounter {
    step: u32,
    last_step_time: f64,
}

impl Default for ComboCounter {
    fn default() -> Self {
        Self {
            step: 0,
            last_step_time: f64::NEG_INFINITY,
        }
    }
}

impl ComboCounter {
    /// Register an attack at `now` and return its step (1 or 2).
    ///
    /// A late input never continues the combo, it starts over at 1.
    pub fn step(&mut self, now: f64, max_delay: f32) -> u32 {
        let late = now - self.last_step_time >= f64::from(max_delay);
        self.step += 1;
        self.last_step_time = now;

        if self.step > 2 || late {
            self.step = 1;
        }
        self.step
    }

    pub fn current(&self) -> u32 {
        self.step
    }
}

/// Owns the active state and everything states share
#[derive(Debug)]
pub struct StateMachine {
    current: StateId,
    previous: Option<StateId>,
    pub(crate) slots: StateSlots,
    pub(crate) cooldowns: Cooldowns,
    pools: ResourcePools,
    combo: ComboCounter,
}

impl StateMachine {
    /// Build a machine and bring it up through `Validation` into `Idle`
    pub fn new(rt: &mut CharacterRuntime) -> Self {
        let mut machine = Self {
            current: StateId::Validation,
            previous: None,
            slots: StateSlots::default(),
            cooldowns: Cooldowns::default(),
            pools: ResourcePools::new(rt.config().max_jumps),
            combo: ComboCounter::default(),
        };
        (StateId::Validation.ops().enter)(&mut machine, rt, None);
        machine.enter_state(rt, StateId::Idle);
        machine
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn previous(&self) -> Option<StateId> {
        self.previous
    }

    pub fn pools(&self) -> &ResourcePools {
        &self.pools
    }

    pub fn combo(&self) -> &ComboCounter {
        &self.combo
    }

    pub fn is_crouch(&self) -> bool {
        self.current.ops().is_crouch
    }

    pub fn is_invincible(&self) -> bool {
        self.current.ops().is_invincible
    }

    /// The only way the active state changes: exit the old one, enter the new
    pub fn enter_state(&mut self, rt: &mut CharacterRuntime, next: StateId) {
        let prev = self.current;
        self.current = next;
        self.previous = Some(prev);

        log::debug!("Knight state {prev:?} -> {next:?}");
        (prev.ops().exit)(self, rt);
        (next.ops().enter)(self, rt, Some(prev));
    }

    /// Enter `id` if its entry condition holds
    pub fn try_enter(&mut self, rt: &mut CharacterRuntime, id: StateId) -> bool {
        if (id.ops().can_enter)(self, rt) {
            self.enter_state(rt, id);
            true
        } else {
            false
        }
    }

    /// Frame tick: update, then evaluate transitions
    pub fn update(&mut self, rt: &mut CharacterRuntime, dt: f32) {
        (self.current.ops().update)(self, rt, dt);
        (self.current.ops().transition)(self, rt);
    }

    pub fn physics_update(&mut self, rt: &mut CharacterRuntime, dt: f32) {
        (self.current.ops().physics_update)(self, rt, dt);
    }

    pub fn handle_jump(&mut self, rt: &mut CharacterRuntime) {
        (self.current.ops().handle_jump)(self, rt);
    }

    pub fn handle_dash(&mut self, rt: &mut CharacterRuntime) {
        (self.current.ops().handle_dash)(self, rt);
    }

    pub fn handle_attack(&mut self, rt: &mut CharacterRuntime) {
        (self.current.ops().handle_attack)(self, rt);
    }

    pub fn handle_heavy_attack(&mut self, rt: &mut CharacterRuntime) {
        (self.current.ops().handle_heavy_attack)(self, rt);
    }

    pub fn handle_directional_dash(&mut self, rt: &mut CharacterRuntime, direction: f32) {
        (self.current.ops().handle_directional_dash)(self, rt, direction);
    }

    /// Airborne -> Fall, no input -> Idle, otherwise Run
    pub fn enter_default_state(&mut self, rt: &mut CharacterRuntime) {
        let next = if !rt.is_grounded() {
            StateId::Fall
        } else if rt.horizontal_move() == 0.0 {
            StateId::Idle
        } else {
            StateId::Run
        };
        self.enter_state(rt, next);
    }

    /// Light attack entry: ground combo or aerial chain
    pub fn try_enter_attack_state(&mut self, rt: &mut CharacterRuntime) -> bool {
        if !rt.performed(Action::Attack) {
            return false;
        }

        if rt.is_grounded() {
            let step = self.combo.step(rt.time(), rt.config().attack_combo_max_delay);
            log::debug!("Ground combo step {step}");
            let next = if step == 1 {
                StateId::FirstAttack
            } else {
                StateId::SecondAttack
            };
            self.enter_state(rt, next);
            return true;
        }

        rt.config().enable_aerial_combat && self.try_enter_aerial_attack_state(rt)
    }

    /// Strict aerial chain: first swing, second swing, downward strike
    pub fn try_enter_aerial_attack_state(&mut self, rt: &mut CharacterRuntime) -> bool {
        if !rt.config().enable_aerial_combat {
            return false;
        }

        let air = self.pools.air_combo;
        match (air.count(), air.is_active()) {
            (0, _) => {
                self.start_air_combo();
                self.enter_state(rt, StateId::AirFirstAttack);
                true
            }
            (1, true) => {
                self.advance_air_combo(rt, StateId::AirSecondAttack);
                true
            }
            (2, true) => {
                self.advance_air_combo(rt, StateId::DownwardStrike);
                true
            }
            (count, active) => {
                log::debug!("Air attack dropped (count {count}, active {active})");
                false
            }
        }
    }

    /// Heavy attack entry: thrust on the ground, fall attack in the air
    pub fn try_enter_heavy_attack_state(&mut self, rt: &mut CharacterRuntime) -> bool {
        if !rt.performed(Action::HeavyAttack) {
            return false;
        }

        if rt.is_grounded() {
            self.enter_state(rt, StateId::ThrustAttack);
            true
        } else if rt.config().enable_aerial_combat {
            self.enter_state(rt, StateId::FallAttack);
            true
        } else {
            false
        }
    }

    /// Dash in `direction` if dashing is enabled and off cooldown
    pub fn try_enter_directional_dash(&mut self, rt: &mut CharacterRuntime, direction: f32) -> bool {
        let config = rt.config();
        if !config.enable_directional_dash || !self.cooldowns.dash.is_ready(rt.time(), config.dash_cooldown) {
            return false;
        }
        self.slots.dash.direction = direction;
        self.enter_state(rt, StateId::DirectionalDash);
        true
    }

    /// Enter Hurt carrying the hit that caused it
    pub fn enter_hurt(&mut self, rt: &mut CharacterRuntime, hit: HitData) {
        self.slots.hurt.hit = Some(hit);
        self.enter_state(rt, StateId::Hurt);
    }

    /// Scripted walk in the facing direction for `duration` seconds
    pub fn enter_fake_walk(&mut self, rt: &mut CharacterRuntime, duration: f32) {
        self.slots.fake_walk.duration = duration;
        self.enter_state(rt, StateId::FakeWalk);
    }

    pub fn reset_jumps(&mut self) {
        self.pools.jumps.reset();
    }

    pub fn try_consume_jump(&mut self) -> bool {
        self.pools.jumps.try_consume()
    }

    pub fn jumps_remaining(&self) -> u32 {
        self.pools.jumps.remaining()
    }

    pub fn start_air_combo(&mut self) {
        self.pools.air_combo.start();
    }

    /// Count the next air attack and switch to it
    pub fn advance_air_combo(&mut self, rt: &mut CharacterRuntime, next: StateId) {
        self.pools.air_combo.advance();
        self.enter_state(rt, next);
    }

    pub fn end_air_combo(&mut self) {
        self.pools.air_combo.end();
    }

    pub fn reset_air_combo(&mut self) {
        self.pools.air_combo.reset();
    }

    pub fn is_in_air_combo(&self) -> bool {
        self.pools.air_combo.is_active()
    }

    /// Landing refills jumps and clears the air combo together
    pub fn on_grounded_landing(&mut self) {
        self.reset_jumps();
        self.reset_air_combo();
    }

    pub fn roll_in_cooldown(&self, rt: &CharacterRuntime) -> bool {
        !self.cooldowns.roll.is_ready(rt.time(), rt.config().roll_cooldown)
    }

    pub fn slide_in_cooldown(&self, rt: &CharacterRuntime) -> bool {
        !self.cooldowns.slide.is_ready(rt.time(), rt.config().slide_cooldown)
    }
}
