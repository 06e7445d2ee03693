// Leveled character attributes (life and friends)

use serde::{Deserialize, Serialize};

/// Tuning for a leveled attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeData<T> {
    pub start_value: T,
    pub step_per_level: T,
    pub max_level: u32,
}

impl Default for AttributeData<f32> {
    fn default() -> Self {
        Self {
            start_value: 100.0,
            step_per_level: 10.0,
            max_level: 10,
        }
    }
}

/// Derives the attribute's maximum from its data and level
pub type AttributeFormula<T> = fn(&AttributeData<T>, u32) -> T;

/// `start_value + level * step_per_level`
pub fn linear_formula(data: &AttributeData<f32>, level: u32) -> f32 {
    data.start_value + level as f32 * data.step_per_level
}

/// A numeric stat with a current value and a level-derived maximum.
///
/// The current value may drop below zero (a killing blow), but never rises
/// above the derived maximum.
#[derive(Debug, Clone)]
pub struct CharacterAttribute<T> {
    data: AttributeData<T>,
    formula: AttributeFormula<T>,
    level: u32,
    current: T,
}

impl<T: Copy + PartialOrd> CharacterAttribute<T> {
    /// New attribute at level 0, filled to its maximum
    pub fn new(data: AttributeData<T>, formula: AttributeFormula<T>) -> Self {
        let current = formula(&data, 0);
        Self {
            data,
            formula,
            level: 0,
            current,
        }
    }

    pub fn data(&self) -> &AttributeData<T> {
        &self.data
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Change the level (capped at `max_level`); the current value is
    /// clamped to the new maximum
    pub fn set_level(&mut self, level: u32) {
        self.level = level.min(self.data.max_level);
        self.set_current_value(self.current);
    }

    pub fn max_value(&self) -> T {
        (self.formula)(&self.data, self.level)
    }

    pub fn current_value(&self) -> T {
        self.current
    }

    pub fn set_current_value(&mut self, value: T) {
        let max = self.max_value();
        self.current = if value > max { max } else { value };
    }
}

impl CharacterAttribute<f32> {
    /// Linear-growth attribute, the shape every knight stat uses
    pub fn linear(data: AttributeData<f32>) -> Self {
        Self::new(data, linear_formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn life() -> CharacterAttribute<f32> {
        CharacterAttribute::linear(AttributeData {
            start_value: 50.0,
            step_per_level: 5.0,
            max_level: 3,
        })
    }

    #[test]
    fn test_starts_full() {
        let attr = life();
        assert_eq!(attr.level(), 0);
        assert_relative_eq!(attr.current_value(), 50.0);
        assert_relative_eq!(attr.max_value(), 50.0);
    }

    #[test]
    fn test_level_scales_maximum() {
        let mut attr = life();
        attr.set_level(2);
        assert_relative_eq!(attr.max_value(), 60.0);
        // Leveling does not heal
        assert_relative_eq!(attr.current_value(), 50.0);

        attr.set_level(99);
        assert_eq!(attr.level(), 3);
        assert_relative_eq!(attr.max_value(), 65.0);
    }

    #[test]
    fn test_current_is_capped_but_may_go_negative() {
        let mut attr = life();
        attr.set_current_value(80.0);
        assert_relative_eq!(attr.current_value(), 50.0);

        attr.set_current_value(-10.0);
        assert_relative_eq!(attr.current_value(), -10.0);
    }

    #[test]
    fn test_custom_formula() {
        fn doubling(data: &AttributeData<f32>, level: u32) -> f32 {
            data.start_value * 2f32.powi(level as i32)
        }
        let mut attr = CharacterAttribute::new(
            AttributeData {
                start_value: 3.0,
                step_per_level: 0.0,
                max_level: 4,
            },
            doubling,
        );
        attr.set_level(3);
        assert_relative_eq!(attr.max_value(), 24.0);
    }
}
