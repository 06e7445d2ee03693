// Keyframed multiplier curves for dash, roll and slide speed profiles

use serde::{Deserialize, Serialize};

use super::math::{inverse_lerp, lerp};

/// A single curve sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear curve over normalized time.
///
/// Keys are kept sorted by time. Outside the key range the curve holds the
/// first/last value. An empty curve is "missing" and callers fall back to
/// [`Curve::linear_falloff`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Constant value over the whole range
    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::new(0.0, value), Keyframe::new(1.0, value)])
    }

    /// 1 at t=0 down to 0 at t=1
    pub fn linear_falloff() -> Self {
        Self::new(vec![Keyframe::new(0.0, 1.0), Keyframe::new(1.0, 0.0)])
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Sample the curve, or `None` when it has no keys
    pub fn sample(&self, t: f32) -> Option<f32> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;

        if t <= first.time {
            return Some(first.value);
        }
        if t >= last.time {
            return Some(last.value);
        }

        let next = self.keys.iter().position(|k| k.time > t)?;
        let a = self.keys[next - 1];
        let b = self.keys[next];
        Some(lerp(a.value, b.value, inverse_lerp(a.time, b.time, t)))
    }

    /// Sample the curve, falling back to a linear falloff when empty
    pub fn evaluate(&self, t: f32) -> f32 {
        self.sample(t)
            .unwrap_or_else(|| lerp(1.0, 0.0, t.clamp(0.0, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_keys_are_sorted() {
        let curve = Curve::new(vec![Keyframe::new(1.0, 0.0), Keyframe::new(0.0, 2.0)]);
        assert_eq!(curve.keys()[0].time, 0.0);
    }

    #[test]
    fn test_interpolates_between_keys() {
        let curve = Curve::new(vec![
            Keyframe::new(0.0, 1.0),
            Keyframe::new(0.5, 2.0),
            Keyframe::new(1.0, 0.0),
        ]);
        assert_relative_eq!(curve.evaluate(0.25), 1.5);
        assert_relative_eq!(curve.evaluate(0.75), 1.0);
    }

    #[test]
    fn test_clamps_outside_range() {
        let curve = Curve::constant(0.8);
        assert_relative_eq!(curve.evaluate(-1.0), 0.8);
        assert_relative_eq!(curve.evaluate(4.0), 0.8);
    }

    #[test]
    fn test_empty_curve_falls_back_to_linear() {
        let curve = Curve::default();
        assert!(curve.sample(0.5).is_none());
        assert_relative_eq!(curve.evaluate(0.0), 1.0);
        assert_relative_eq!(curve.evaluate(0.5), 0.5);
        assert_relative_eq!(curve.evaluate(2.0), 0.0);
    }
}
