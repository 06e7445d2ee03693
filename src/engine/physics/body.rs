use super::collision::CollisionGroups;
use super::world::PhysicsWorld;
use crate::core::Rect;
use glam::Vec2;
use rapier2d::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Rigid body operations a character controller needs
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);

    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);

    fn set_velocity_x(&mut self, x: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(x, v.y));
    }

    fn set_velocity_y(&mut self, y: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(v.x, y));
    }

    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);

    /// World gravity acting on the body at scale 1
    fn gravity(&self) -> Vec2;

    fn add_impulse(&mut self, impulse: Vec2);

    /// Move by `velocity * dt` this step, stopping at solid geometry.
    /// Vertical dynamics are kept when `velocity.y` is zero.
    fn slide(&mut self, velocity: Vec2, dt: f32);

    /// Replace the collision box, relative to the body origin
    fn set_collider(&mut self, bounds: Rect);
}

/// `PhysicsBody` backed by a rapier rigid body in a shared world
pub struct RapierBody {
    world: Rc<RefCell<PhysicsWorld>>,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl RapierBody {
    pub fn new(world: Rc<RefCell<PhysicsWorld>>, body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self { world, body, collider }
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    fn with_body<R>(&self, default: R, f: impl FnOnce(&RigidBody) -> R) -> R {
        self.world.borrow().get_rigid_body(self.body).map_or(default, f)
    }

    fn with_body_mut(&mut self, f: impl FnOnce(&mut RigidBody)) {
        if let Some(body) = self.world.borrow_mut().get_rigid_body_mut(self.body) {
            f(body);
        }
    }
}

impl PhysicsBody for RapierBody {
    fn position(&self) -> Vec2 {
        self.with_body(Vec2::ZERO, |b| Vec2::new(b.translation().x, b.translation().y))
    }

    fn set_position(&mut self, position: Vec2) {
        self.with_body_mut(|b| b.set_translation(vector![position.x, position.y], true));
    }

    fn velocity(&self) -> Vec2 {
        self.with_body(Vec2::ZERO, |b| Vec2::new(b.linvel().x, b.linvel().y))
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.with_body_mut(|b| b.set_linvel(vector![velocity.x, velocity.y], true));
    }

    fn gravity_scale(&self) -> f32 {
        self.with_body(1.0, |b| b.gravity_scale())
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.with_body_mut(|b| b.set_gravity_scale(scale, true));
    }

    fn gravity(&self) -> Vec2 {
        let g = self.world.borrow().gravity();
        Vec2::new(g.x, g.y)
    }

    fn add_impulse(&mut self, impulse: Vec2) {
        self.with_body_mut(|b| b.apply_impulse(vector![impulse.x, impulse.y], true));
    }

    fn slide(&mut self, velocity: Vec2, dt: f32) {
        self.world
            .borrow_mut()
            .slide_collider(self.collider, velocity * dt);

        // Horizontal motion is owned by slides; gravity keeps driving y
        self.with_body_mut(|b| {
            let y = if velocity.y != 0.0 { 0.0 } else { b.linvel().y };
            b.set_linvel(vector![0.0, y], true);
        });
    }

    fn set_collider(&mut self, bounds: Rect) {
        let half = bounds.half_extents();
        let center = bounds.center();
        if let Some(collider) = self.world.borrow_mut().get_collider_mut(self.collider) {
            collider.set_shape(SharedShape::cuboid(half.x, half.y));
            collider.set_translation_wrt_parent(vector![center.x, center.y]);
        }
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
    ccd: bool,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            gravity_scale: 1.0,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
            ccd: false,
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            gravity_scale: 0.0,
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
            ccd: false,
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the gravity scale (1.0 = normal gravity, 0.0 = no gravity)
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (characters stay upright)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Continuous collision detection for fast falls
    pub fn ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .ccd_enabled(self.ccd)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    translation: Vector<Real>,
    collision_groups: CollisionGroups,
    is_sensor: bool,
    friction: Real,
    restitution: Real,
    density: Real,
    active_hooks: ActiveHooks,
}

impl ColliderBuilder2D {
    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self {
            shape: SharedShape::cuboid(half_width, half_height),
            translation: Vector::zeros(),
            collision_groups: CollisionGroups::Ground,
            is_sensor: false,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
            active_hooks: ActiveHooks::empty(),
        }
    }

    /// Box collider covering a rectangle in body space
    pub fn rect(bounds: Rect) -> Self {
        let half = bounds.half_extents();
        let center = bounds.center();
        let mut builder = Self::box_shape(half.x, half.y);
        builder.translation = vector![center.x, center.y];
        builder
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Make this a sensor (detects overlaps but doesn't cause physical response)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set density (mass will be calculated from shape volume)
    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    /// Run the world's contact filter hooks for this collider
    pub fn hooks(mut self, hooks: ActiveHooks) -> Self {
        self.active_hooks |= hooks;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        rapier2d::prelude::ColliderBuilder::new(self.shape)
            .translation(self.translation)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .sensor(self.is_sensor)
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .active_hooks(self.active_hooks)
            .build()
    }
}

/// Common rigid body configurations for arena objects
pub mod presets {
    use super::*;

    /// Knight body (dynamic, rotation locked, never sleeps)
    pub fn knight_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .can_sleep(false)
            .ccd(true)
            .build()
    }

    /// Knight collider from its standing bounds
    pub fn knight_collider(bounds: Rect) -> Collider {
        ColliderBuilder2D::rect(bounds)
            .collision_groups(CollisionGroups::Knight)
            .friction(0.0) // No friction for smooth movement
            .hooks(ActiveHooks::FILTER_CONTACT_PAIRS | ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build()
    }

    /// Static terrain body
    pub fn terrain_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Solid floor or wall block
    pub fn terrain_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Ground)
            .friction(0.3)
            .build()
    }

    /// Thin platform the knight can jump through and drop from
    pub fn one_way_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::OneWayPlatform)
            .friction(0.3)
            .hooks(ActiveHooks::FILTER_CONTACT_PAIRS | ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .build()
    }

    /// Sensor that attacks can hit but that does not block movement
    pub fn hittable_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Hittable)
            .sensor(true)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_body_builder_dynamic() {
        let body = BodyBuilder::new_dynamic().position(10.0, 20.0).build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
    }

    #[test]
    fn test_knight_preset() {
        let body = presets::knight_body(0.0, 0.0);
        let collider = presets::knight_collider(Rect::new(-0.25, 0.0, 0.5, 1.0));

        assert!(body.is_rotation_locked());
        assert!(!collider.is_sensor());
        assert_relative_eq!(collider.position_wrt_parent().map_or(0.0, |p| p.translation.y), 0.5);
    }

    #[test]
    fn test_hittable_preset_is_sensor() {
        assert!(presets::hittable_collider(1.0, 2.0).is_sensor());
    }

    fn knight_in_world() -> (Rc<RefCell<PhysicsWorld>>, RapierBody) {
        let world = Rc::new(RefCell::new(PhysicsWorld::new()));
        let (body, collider) = {
            let mut w = world.borrow_mut();
            let body = w.add_rigid_body(presets::knight_body(0.0, 5.0));
            let collider = w.add_collider(presets::knight_collider(Rect::new(-0.25, 0.0, 0.5, 1.0)), body);
            (body, collider)
        };
        let knight = RapierBody::new(world.clone(), body, collider);
        (world, knight)
    }

    #[test]
    fn test_rapier_body_velocity_axes() {
        let (_world, mut knight) = knight_in_world();
        knight.set_velocity(Vec2::new(1.0, 2.0));
        knight.set_velocity_x(-3.0);

        assert_eq!(knight.velocity(), Vec2::new(-3.0, 2.0));
        knight.set_velocity_y(0.0);
        assert_eq!(knight.velocity(), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_rapier_body_gravity_scale() {
        let (_world, mut knight) = knight_in_world();
        knight.set_gravity_scale(0.1);
        assert_relative_eq!(knight.gravity_scale(), 0.1);
        assert_relative_eq!(knight.gravity().y, -9.81);
    }

    #[test]
    fn test_rapier_body_set_collider_resizes() {
        let (world, mut knight) = knight_in_world();
        knight.set_collider(Rect::new(-0.25, 0.0, 0.5, 0.5));

        let w = world.borrow();
        let cuboid = w
            .get_collider(knight.collider())
            .and_then(|c| c.shape().as_cuboid().map(|c| c.half_extents))
            .expect("collider should stay a box");
        assert_relative_eq!(cuboid.y, 0.25);
    }

    #[test]
    fn test_rapier_body_slide_moves_in_open_space() {
        let (_world, mut knight) = knight_in_world();
        knight.slide(Vec2::new(2.0, 0.0), 0.5);
        assert_relative_eq!(knight.position().x, 1.0, epsilon = 0.05);
    }
}
