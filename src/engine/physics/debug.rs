use crate::core::Rect;
use glam::Vec2;
use rapier2d::prelude::*;

use super::world::DebugData;

pub type Color = [f32; 4];

pub const DYNAMIC_COLOR: Color = [0.0, 1.0, 0.0, 0.8];
pub const FIXED_COLOR: Color = [0.5, 0.5, 0.5, 0.8];
pub const KINEMATIC_COLOR: Color = [0.0, 0.5, 1.0, 0.8];
pub const ORPHAN_COLOR: Color = [1.0, 1.0, 1.0, 0.8];

/// A single debug line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
}

/// Collects wire shapes for editor-style overlays.
///
/// Drawing has no effect on the simulation; a frontend consumes `lines()`.
#[derive(Debug)]
pub struct DebugDraw {
    lines: Vec<DebugLine>,
    color: Color,
    enabled: bool,
}

impl DebugDraw {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            color: ORPHAN_COLOR,
            enabled: true,
        }
    }

    /// Enable or disable collection
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Color used by subsequent shapes
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    pub fn line(&mut self, from: Vec2, to: Vec2) -> &mut Self {
        if self.enabled {
            self.lines.push(DebugLine {
                from,
                to,
                color: self.color,
            });
        }
        self
    }

    /// Draw a world-space rectangle outline
    pub fn wire_rect(&mut self, rect: Rect) -> &mut Self {
        let min = rect.min;
        let max = rect.max();
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        for i in 0..4 {
            self.line(corners[i], corners[(i + 1) % 4]);
        }
        self
    }

    /// Draw every collider of a physics world, colored by body type
    pub fn draw_world(&mut self, data: DebugData<'_>) {
        if !self.enabled {
            return;
        }

        let identity = Isometry::identity();
        for (_handle, collider) in data.colliders.iter() {
            let parent_body = collider.parent().and_then(|h| data.rigid_bodies.get(h));
            let color = match parent_body.map(|b| b.body_type()) {
                Some(RigidBodyType::Dynamic) => DYNAMIC_COLOR,
                Some(RigidBodyType::Fixed) => FIXED_COLOR,
                Some(_) => KINEMATIC_COLOR,
                None => ORPHAN_COLOR,
            };
            self.set_color(color);

            let position = if parent_body.is_some() {
                collider.position()
            } else {
                &identity
            };
            self.draw_collider_shape(collider, position);
        }
    }

    fn draw_collider_shape(&mut self, collider: &Collider, transform: &Isometry<Real>) {
        match collider.shape().shape_type() {
            ShapeType::Ball => {
                if let Some(ball) = collider.shape().as_ball() {
                    self.draw_circle(transform, ball.radius);
                }
            }
            ShapeType::Cuboid => {
                if let Some(cuboid) = collider.shape().as_cuboid() {
                    self.draw_box(transform, cuboid.half_extents);
                }
            }
            _ => {
                // For other shapes, draw a simple cross
                self.draw_cross(transform, 0.5);
            }
        }
    }

    fn draw_circle(&mut self, transform: &Isometry<Real>, radius: Real) {
        const SEGMENTS: usize = 16;
        let points: Vec<Vec2> = (0..SEGMENTS)
            .map(|i| {
                let angle = (i as f32 / SEGMENTS as f32) * std::f32::consts::TAU;
                to_vec2(transform * point![angle.cos() * radius, angle.sin() * radius])
            })
            .collect();
        for i in 0..SEGMENTS {
            self.line(points[i], points[(i + 1) % SEGMENTS]);
        }
    }

    fn draw_box(&mut self, transform: &Isometry<Real>, half_extents: Vector<Real>) {
        let corners = [
            [-half_extents.x, -half_extents.y],
            [half_extents.x, -half_extents.y],
            [half_extents.x, half_extents.y],
            [-half_extents.x, half_extents.y],
        ]
        .map(|c| to_vec2(transform * point![c[0], c[1]]));

        for i in 0..4 {
            self.line(corners[i], corners[(i + 1) % 4]);
        }
    }

    fn draw_cross(&mut self, transform: &Isometry<Real>, size: Real) {
        let h = [point![-size, 0.0], point![size, 0.0]].map(|p| to_vec2(transform * p));
        let v = [point![0.0, -size], point![0.0, size]].map(|p| to_vec2(transform * p));
        self.line(h[0], h[1]);
        self.line(v[0], v[1]);
    }
}

impl Default for DebugDraw {
    fn default() -> Self {
        Self::new()
    }
}

fn to_vec2(p: Point<Real>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;
    use crate::engine::physics::PhysicsWorld;

    #[test]
    fn test_wire_rect_has_four_edges() {
        let mut draw = DebugDraw::new();
        draw.set_color(FIXED_COLOR).wire_rect(Rect::new(0.0, 0.0, 2.0, 1.0));

        assert_eq!(draw.lines().len(), 4);
        assert_eq!(draw.lines()[0].from, Vec2::ZERO);
        assert_eq!(draw.lines()[1].from, Vec2::new(2.0, 0.0));
        assert!(draw.lines().iter().all(|l| l.color == FIXED_COLOR));
    }

    #[test]
    fn test_disabled_draw_collects_nothing() {
        let mut draw = DebugDraw::new();
        draw.set_enabled(false);
        draw.wire_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(draw.lines().is_empty());
    }

    #[test]
    fn test_draw_world_outlines_colliders() {
        let mut world = PhysicsWorld::new();
        let floor = world.add_rigid_body(presets::terrain_body(0.0, 0.0));
        world.add_collider(presets::terrain_collider(4.0, 1.0), floor);

        let mut draw = DebugDraw::new();
        draw.draw_world(world.debug_data());

        assert_eq!(draw.lines().len(), 4);
        assert_eq!(draw.lines()[0].color, FIXED_COLOR);
        assert_eq!(draw.lines()[0].from, Vec2::new(-2.0, -0.5));
    }
}
