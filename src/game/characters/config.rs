// Knight tuning - loaded once from RON and shared by every system

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::attribute::AttributeData;
use crate::core::{Curve, Keyframe, Rect};
use crate::engine::assets::{AssetError, AssetLoader, AssetType};

/// Errors raised while loading or validating a knight configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load knight config: {0}")]
    Asset(#[from] AssetError),

    #[error("Attack '{name}' triggers at {trigger_time}s but only lasts {duration}s")]
    InvalidAttack {
        name: &'static str,
        trigger_time: f32,
        duration: f32,
    },

    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// Timing, hitbox and damage of one attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackDefinition {
    /// Total length of the attack window (seconds)
    pub duration: f32,
    /// Forward step taken when the hit fires
    pub horizontal_move_offset: f32,
    /// Time into the window at which the hit fires
    pub trigger_time: f32,
    /// Tail of the window during which buffered commands may run
    pub attack_end_offset: f32,
    /// Hit area relative to the knight, authored facing right
    pub hitbox: Rect,
    pub damage: i32,
    pub knockback_force: f32,
}

impl Default for AttackDefinition {
    fn default() -> Self {
        Self {
            duration: 0.4,
            horizontal_move_offset: 0.1,
            trigger_time: 0.15,
            attack_end_offset: 0.1,
            hitbox: Rect::new(0.2, -0.6, 1.2, 1.2),
            damage: 10,
            knockback_force: 4.0,
        }
    }
}

impl AttackDefinition {
    /// Copy with damage and knockback scaled; damage is rounded
    pub fn scaled(&self, damage_multiplier: f32, force_multiplier: f32) -> Self {
        Self {
            damage: (self.damage as f32 * damage_multiplier).round() as i32,
            knockback_force: self.knockback_force * force_multiplier,
            ..*self
        }
    }

    /// Time after which the active part of the window is over
    pub fn active_end(&self) -> f32 {
        self.duration - self.attack_end_offset
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.duration < 0.0 || self.trigger_time < 0.0 || self.trigger_time > self.duration {
            return Err(ConfigError::InvalidAttack {
                name,
                trigger_time: self.trigger_time,
                duration: self.duration,
            });
        }
        Ok(())
    }
}

/// Every tunable of the knight controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnightConfig {
    // Properties
    pub life: AttributeData<f32>,

    // Movement
    pub move_speed: f32,
    pub air_move_speed: f32,

    // Jump
    /// Upward speed of a grounded jump
    pub jump_height: f32,
    /// Extra gravity while falling
    pub jump_fall_multiplier: f32,
    /// Extra gravity once the jump button is released
    pub jump_low_multiplier: f32,
    pub enable_double_jump: bool,
    pub double_jump_height: f32,
    pub max_jumps: u32,

    // Fall
    /// Fall distance above which landing kicks up dust
    pub fall_particles_distance: f32,

    // Crouch
    pub crouch_walk_speed: f32,
    pub crouch_transition_time: f32,
    pub platform_drop_time: f32,

    // Slide
    pub slide_duration: f32,
    pub slide_speed: f32,
    pub slide_cooldown: f32,
    pub slide_move_curve: Curve,
    pub slide_transition_time: f32,

    // Roll
    pub roll_duration: f32,
    pub roll_speed: f32,
    pub roll_cooldown: f32,
    pub roll_move_curve: Curve,

    // Directional dash
    pub enable_directional_dash: bool,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Empty means full speed for 80% of the dash, then a linear falloff
    pub dash_curve: Curve,

    // Ground attacks
    pub attack_combo_max_delay: f32,
    pub first_attack: AttackDefinition,
    pub second_attack: AttackDefinition,
    pub crouch_attack: AttackDefinition,
    pub thrust_damage_multiplier: f32,
    pub thrust_knockback_multiplier: f32,

    // Aerial combat
    pub enable_aerial_combat: bool,
    pub air_first_attack: AttackDefinition,
    pub air_second_attack: AttackDefinition,
    pub air_downward_strike: AttackDefinition,
    /// Grace period after the first air attack's hover for a follow-up
    pub air_combo_window: f32,
    pub air_attack_hover_duration: f32,
    pub air_attack_hover_gravity: f32,
    pub air_attack_forward_distance: f32,
    pub downward_strike_acceleration: f32,
    pub downward_strike_damage_multiplier: f32,
    pub downward_strike_hover_time: f32,

    // Fall attack
    pub fall_attack: AttackDefinition,
    pub minimum_fall_height: f32,
    pub fall_attack_damage_multiplier: f32,
    pub fall_attack_initial_speed: f32,
    pub fall_attack_gravity_scale: f32,
    pub fall_attack_acceleration: f32,
    pub fall_attack_air_control: f32,
    pub fall_attack_mid_air_multiplier: f32,
    pub fall_attack_mid_air_knockback: f32,
    pub fall_attack_bounce_speed: f32,
    pub fall_attack_scan_size: Vec2,

    // Wall abilities
    pub wall_slide_speed: f32,
    pub wall_jump_force: Vec2,
    pub wall_jump_duration: f32,

    // Hurt
    pub hurt_time: f32,

    // Fake walk
    pub fake_walk_on_scene_transition_time: f32,

    // Invincibility
    pub invincibility_alpha_change: f32,
    pub invincibility_fade_speed: f32,
    pub default_invincibility_time: f32,

    // Colliders
    pub stand_collider: Rect,
    pub crouch_collider: Rect,
    /// Space that must be free for a crouching knight to stand up
    pub crouch_head_rect: Rect,
}

impl Default for KnightConfig {
    fn default() -> Self {
        let ease_out = Curve::new(vec![
            Keyframe::new(0.0, 1.0),
            Keyframe::new(0.7, 0.9),
            Keyframe::new(1.0, 0.2),
        ]);

        Self {
            life: AttributeData::default(),

            move_speed: 7.0,
            air_move_speed: 6.0,

            jump_height: 13.0,
            jump_fall_multiplier: 1.6,
            jump_low_multiplier: 2.2,
            enable_double_jump: true,
            double_jump_height: 11.0,
            max_jumps: 2,

            fall_particles_distance: 3.0,

            crouch_walk_speed: 3.0,
            crouch_transition_time: 0.1,
            platform_drop_time: 0.25,

            slide_duration: 0.5,
            slide_speed: 11.0,
            slide_cooldown: 0.6,
            slide_move_curve: ease_out.clone(),
            slide_transition_time: 0.15,

            roll_duration: 0.4,
            roll_speed: 10.0,
            roll_cooldown: 1.0,
            roll_move_curve: ease_out,

            enable_directional_dash: true,
            dash_speed: 20.0,
            dash_duration: 0.15,
            dash_cooldown: 2.0,
            dash_curve: Curve::default(),

            attack_combo_max_delay: 0.5,
            first_attack: AttackDefinition::default(),
            second_attack: AttackDefinition {
                duration: 0.45,
                trigger_time: 0.2,
                damage: 12,
                ..AttackDefinition::default()
            },
            crouch_attack: AttackDefinition {
                duration: 0.35,
                trigger_time: 0.12,
                hitbox: Rect::new(0.2, -0.9, 1.2, 0.8),
                damage: 8,
                ..AttackDefinition::default()
            },
            thrust_damage_multiplier: 1.3,
            thrust_knockback_multiplier: 1.1,

            enable_aerial_combat: true,
            air_first_attack: AttackDefinition {
                duration: 0.35,
                trigger_time: 0.1,
                horizontal_move_offset: 0.0,
                ..AttackDefinition::default()
            },
            air_second_attack: AttackDefinition {
                duration: 0.35,
                trigger_time: 0.1,
                horizontal_move_offset: 0.0,
                damage: 12,
                ..AttackDefinition::default()
            },
            air_downward_strike: AttackDefinition {
                duration: 0.5,
                trigger_time: 0.15,
                horizontal_move_offset: 0.0,
                hitbox: Rect::new(-0.6, -1.4, 1.2, 1.2),
                damage: 15,
                knockback_force: 6.0,
                ..AttackDefinition::default()
            },
            air_combo_window: 2.0,
            air_attack_hover_duration: 0.3,
            air_attack_hover_gravity: 0.1,
            air_attack_forward_distance: 1.5,
            downward_strike_acceleration: 25.0,
            downward_strike_damage_multiplier: 1.8,
            downward_strike_hover_time: 0.1,

            fall_attack: AttackDefinition {
                duration: 1.5,
                trigger_time: 0.0,
                horizontal_move_offset: 0.0,
                hitbox: Rect::new(-1.0, -1.2, 2.0, 1.0),
                damage: 14,
                knockback_force: 5.0,
                ..AttackDefinition::default()
            },
            minimum_fall_height: 2.0,
            fall_attack_damage_multiplier: 1.5,
            fall_attack_initial_speed: 8.0,
            fall_attack_gravity_scale: 3.5,
            fall_attack_acceleration: 15.0,
            fall_attack_air_control: 0.5,
            fall_attack_mid_air_multiplier: 0.7,
            fall_attack_mid_air_knockback: 0.8,
            fall_attack_bounce_speed: 3.0,
            fall_attack_scan_size: Vec2::new(0.8, 1.2),

            wall_slide_speed: 2.0,
            wall_jump_force: Vec2::new(7.0, 11.0),
            wall_jump_duration: 0.2,

            hurt_time: 0.3,

            fake_walk_on_scene_transition_time: 0.5,

            invincibility_alpha_change: 0.6,
            invincibility_fade_speed: 6.0,
            default_invincibility_time: 1.0,

            stand_collider: Rect::new(-0.35, -0.9, 0.7, 1.8),
            crouch_collider: Rect::new(-0.35, -0.9, 0.7, 1.1),
            crouch_head_rect: Rect::new(-0.3, 0.25, 0.6, 0.6),
        }
    }
}

impl KnightConfig {
    /// Load and validate a configuration from the config asset directory
    pub fn load(loader: &AssetLoader, name: &str) -> Result<Self, ConfigError> {
        let config: Self = loader.load_ron(AssetType::Config, name)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration, falling back to the defaults when it is missing
    /// or invalid
    pub fn load_or_default(loader: &AssetLoader, name: &str) -> Self {
        match Self::load(loader, name) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Using default knight config: {err}");
                Self::default()
            }
        }
    }

    /// Check every attack window and the values that must not be negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, attack) in self.attacks() {
            attack.validate(name)?;
        }

        let non_negative = [
            ("move_speed", self.move_speed),
            ("crouch_transition_time", self.crouch_transition_time),
            ("platform_drop_time", self.platform_drop_time),
            ("slide_duration", self.slide_duration),
            ("slide_cooldown", self.slide_cooldown),
            ("roll_duration", self.roll_duration),
            ("roll_cooldown", self.roll_cooldown),
            ("dash_duration", self.dash_duration),
            ("dash_cooldown", self.dash_cooldown),
            ("attack_combo_max_delay", self.attack_combo_max_delay),
            ("air_combo_window", self.air_combo_window),
            ("air_attack_hover_duration", self.air_attack_hover_duration),
            ("downward_strike_hover_time", self.downward_strike_hover_time),
            ("wall_jump_duration", self.wall_jump_duration),
            ("hurt_time", self.hurt_time),
            ("default_invincibility_time", self.default_invincibility_time),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        if self.max_jumps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_jumps",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Every attack definition with its field name
    pub fn attacks(&self) -> [(&'static str, &AttackDefinition); 7] {
        [
            ("first_attack", &self.first_attack),
            ("second_attack", &self.second_attack),
            ("crouch_attack", &self.crouch_attack),
            ("air_first_attack", &self.air_first_attack),
            ("air_second_attack", &self.air_second_attack),
            ("air_downward_strike", &self.air_downward_strike),
            ("fall_attack", &self.fall_attack),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{from_ron_str, to_ron_string};

    #[test]
    fn test_default_config_is_valid() {
        let config = KnightConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_jumps, 2);
        assert_eq!(config.air_combo_window, 2.0);
        assert!(config.dash_curve.is_empty());
    }

    #[test]
    fn test_trigger_after_duration_is_rejected() {
        let mut config = KnightConfig::default();
        config.second_attack.trigger_time = 2.0;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidAttack {
                name: "second_attack",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let config = KnightConfig {
            roll_duration: -0.1,
            ..KnightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "roll_duration",
                ..
            })
        ));
    }

    #[test]
    fn test_scaled_attack_rounds_damage() {
        let attack = AttackDefinition {
            damage: 10,
            knockback_force: 4.0,
            ..AttackDefinition::default()
        };
        let thrust = attack.scaled(1.3, 1.1);
        assert_eq!(thrust.damage, 13);
        assert!((thrust.knockback_force - 4.4).abs() < 1e-5);
        assert_eq!(thrust.duration, attack.duration);

        assert_eq!(attack.scaled(1.25, 1.0).damage, 13);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: KnightConfig = from_ron_str("(move_speed: 9.5, max_jumps: 3)").unwrap();
        assert_eq!(config.move_speed, 9.5);
        assert_eq!(config.max_jumps, 3);
        assert_eq!(config.roll_cooldown, KnightConfig::default().roll_cooldown);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = KnightConfig::default();
        let text = to_ron_string(&config).unwrap();
        let parsed: KnightConfig = from_ron_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
