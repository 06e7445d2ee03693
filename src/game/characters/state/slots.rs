// Per-activation data of each state, reset on entry

use crate::game::characters::combat::HitData;

/// A cooldown measured from the last time a state was left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    last_exit: f64,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self {
            last_exit: f64::NEG_INFINITY,
        }
    }
}

impl Cooldown {
    pub fn is_ready(&self, now: f64, cooldown: f32) -> bool {
        now - self.last_exit >= f64::from(cooldown)
    }

    pub fn start(&mut self, now: f64) {
        self.last_exit = now;
    }

    pub fn last_exit(&self) -> f64 {
        self.last_exit
    }
}

/// Cooldowns outlive activations, so they live apart from the slots
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldowns {
    pub roll: Cooldown,
    pub slide: Cooldown,
    pub dash: Cooldown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpSlot {
    pub jump_held: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FallSlot {
    pub start_y: f32,
}

/// Elapsed time only (roll, wall jump)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimedSlot {
    pub elapsed: f32,
}

/// Shared by both crouch states; only one is ever active
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrouchSlot {
    pub elapsed: f32,
    pub quitting: bool,
    pub quitting_elapsed: f32,
    pub swapped_animation: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlideSlot {
    pub elapsed: f32,
    pub ending: bool,
}

/// Dash buffered during an attack, run once the active window is over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitCommand {
    #[default]
    None,
    Roll,
    Slide,
}

/// Shared by the ground attack states
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttackSlot {
    pub elapsed: f32,
    pub triggered: bool,
    pub exit_command: ExitCommand,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirAttackSlot {
    pub elapsed: f32,
    pub triggered: bool,
    pub hovering: bool,
    pub start_x: f32,
    pub move_speed: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DownwardStrikeSlot {
    pub elapsed: f32,
    pub triggered: bool,
    pub accelerating: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FallAttackSlot {
    pub elapsed: f32,
    pub start_y: f32,
    pub hit_mid_air: bool,
    pub landing_done: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HurtSlot {
    pub elapsed: f32,
    pub hit: Option<HitData>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FakeWalkSlot {
    pub elapsed: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashSlot {
    pub elapsed: f32,
    pub direction: f32,
}

/// Transient data for every state
#[derive(Debug, Clone, Default)]
pub struct StateSlots {
    pub jump: JumpSlot,
    pub fall: FallSlot,
    pub roll: TimedSlot,
    pub crouch: CrouchSlot,
    pub slide: SlideSlot,
    pub walljump: TimedSlot,
    pub attack: AttackSlot,
    pub air_attack: AirAttackSlot,
    pub downward_strike: DownwardStrikeSlot,
    pub fall_attack: FallAttackSlot,
    pub hurt: HurtSlot,
    pub fake_walk: FakeWalkSlot,
    pub dash: DashSlot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_starts_ready() {
        let cooldown = Cooldown::default();
        assert!(cooldown.is_ready(0.0, 100.0));
    }

    #[test]
    fn test_cooldown_measures_from_exit() {
        let mut cooldown = Cooldown::default();
        cooldown.start(0.4);
        assert!(!cooldown.is_ready(0.5, 1.0));
        assert!(cooldown.is_ready(1.41, 1.0));
    }

    #[test]
    fn test_cooldown_keeps_millisecond_gaps_in_long_sessions() {
        // A bit over 28 hours of frame time
        let now = 100_800.0;
        let mut cooldown = Cooldown::default();
        cooldown.start(now);
        assert!(!cooldown.is_ready(now + 0.004, 0.005));
        assert!(cooldown.is_ready(now + 0.006, 0.005));
    }
}
