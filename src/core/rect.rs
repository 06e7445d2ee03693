// Axis-aligned rectangle used for collider bounds, hitboxes and query areas

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle described by its minimum corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Build a rectangle around a center point
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Same rectangle moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            size: self.size,
        }
    }

    /// Local rectangle placed in world space for a character at `origin`
    /// facing `facing` (the local x axis is mirrored when facing left)
    pub fn to_world(&self, origin: Vec2, facing: f32) -> Self {
        let center = self.center();
        Self::from_center(origin + Vec2::new(center.x * facing, center.y), self.size)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_max() {
        let rect = Rect::new(-0.5, 0.0, 1.0, 2.0);
        assert_eq!(rect.center(), Vec2::new(0.0, 1.0));
        assert_eq!(rect.max(), Vec2::new(0.5, 2.0));
        assert_eq!(rect.half_extents(), Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_to_world_mirrors_when_facing_left() {
        let hitbox = Rect::new(0.5, 0.0, 1.0, 1.0);
        let right = hitbox.to_world(Vec2::new(10.0, 0.0), 1.0);
        let left = hitbox.to_world(Vec2::new(10.0, 0.0), -1.0);

        assert_eq!(right.center(), Vec2::new(11.0, 0.5));
        assert_eq!(left.center(), Vec2::new(9.0, 0.5));
        assert_eq!(left.size, hitbox.size);
    }

    #[test]
    fn test_overlaps() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(0.5, 0.5, 1.0, 1.0);
        let c = Rect::new(2.0, 2.0, 1.0, 1.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_contains() {
        let rect = Rect::from_center(Vec2::ZERO, Vec2::splat(2.0));
        assert!(rect.contains(Vec2::new(0.9, -0.9)));
        assert!(!rect.contains(Vec2::new(1.1, 0.0)));
    }
}
