// Math utilities and helper functions

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of `lerp`: where `value` sits between `a` and `b` (unclamped)
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Bounce `t` back and forth between 0 and `length`
pub fn ping_pong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let wrapped = t.rem_euclid(length * 2.0);
    length - (wrapped - length).abs()
}

/// Normalized progress of `elapsed` through `duration`.
///
/// A non-positive duration counts as already complete.
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        elapsed / duration
    } else {
        1.0
    }
}

/// Sign of a horizontal axis value as -1, 0 or 1
pub fn axis_sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
        assert_eq!(inverse_lerp(2.0, 2.0, 5.0), 0.0);
    }

    #[test]
    fn test_ping_pong() {
        assert_relative_eq!(ping_pong(0.0, 0.5), 0.0);
        assert_relative_eq!(ping_pong(0.25, 0.5), 0.25);
        assert_relative_eq!(ping_pong(0.75, 0.5), 0.25);
        assert_relative_eq!(ping_pong(1.0, 0.5), 0.0);
        assert_eq!(ping_pong(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_progress_zero_duration_is_complete() {
        assert_eq!(progress(0.0, 0.0), 1.0);
        assert_relative_eq!(progress(0.2, 0.4), 0.5);
    }

    #[test]
    fn test_axis_sign() {
        assert_eq!(axis_sign(0.3), 1);
        assert_eq!(axis_sign(-2.0), -1);
        assert_eq!(axis_sign(0.0), 0);
    }
}
