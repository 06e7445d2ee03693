use glam::Vec2;
use rapier2d::control::KinematicCharacterController;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::collision::{CollisionGroups, ContactFilter};
use super::contacts::ContactId;
use crate::core::Rect;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for overlap and shape queries
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Ignored pairs and one-way platforms
    contact_filter: ContactFilter,

    /// User data mapping from colliders to game entity IDs
    collider_to_entity: HashMap<ColliderHandle, u64>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            contact_filter: ContactFilter::default(),
            collider_to_entity: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.contact_filter,
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Get a mutable reference to a collider
    pub fn get_collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.collider_set.get_mut(handle)
    }

    /// Associate a game entity ID with a collider
    pub fn set_entity_mapping(&mut self, collider: ColliderHandle, entity_id: u64) {
        self.collider_to_entity.insert(collider, entity_id);
    }

    /// Get the entity ID associated with a collider
    pub fn get_entity_id(&self, collider: ColliderHandle) -> Option<u64> {
        self.collider_to_entity.get(&collider).copied()
    }

    /// Register a collider as a one-way platform
    pub fn mark_one_way(&mut self, platform: ColliderHandle) {
        self.contact_filter.mark_one_way(platform);
    }

    pub fn is_one_way(&self, collider: ColliderHandle) -> bool {
        self.contact_filter.is_one_way(collider)
    }

    /// Enable or disable contacts between two colliders
    pub fn set_pair_ignored(&mut self, a: ColliderHandle, b: ColliderHandle, ignored: bool) {
        self.contact_filter.set_ignored(a, b, ignored);
    }

    pub fn is_pair_ignored(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.contact_filter.is_ignored(a, b)
    }

    /// Active contacts of a collider, one normal per touching collider.
    ///
    /// Normals point from the other collider toward `collider`. Contacts
    /// discarded by the contact filter are skipped.
    pub fn contact_samples(&self, collider: ColliderHandle) -> Vec<(ContactId, Vec2)> {
        let mut samples = Vec::new();

        for pair in self.narrow_phase.contact_pairs_with(collider) {
            if !pair.has_any_active_contact {
                continue;
            }
            let (other, flip) = if pair.collider1 == collider {
                (pair.collider2, true)
            } else {
                (pair.collider1, false)
            };

            let manifold = pair
                .manifolds
                .iter()
                .find(|m| !m.data.solver_contacts.is_empty());
            if let Some(manifold) = manifold {
                // Manifold normals point away from collider1
                let n = manifold.data.normal;
                let normal = if flip { Vec2::new(-n.x, -n.y) } else { Vec2::new(n.x, n.y) };
                samples.push((ContactId::from_collider(other), normal));
            }
        }

        samples
    }

    /// Colliders of `group` overlapping a world-space rectangle
    pub fn intersecting_colliders(&self, area: Rect, group: CollisionGroups) -> Vec<ColliderHandle> {
        let half = area.half_extents();
        let center = area.center();
        let shape = Cuboid::new(vector![half.x, half.y]);
        let shape_pos = Isometry::translation(center.x, center.y);
        let filter = QueryFilter::new().groups(group.query_groups());

        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape,
            filter,
            |handle| {
                hits.push(handle);
                true
            },
        );
        hits
    }

    /// Move a body's collider by `desired`, stopping at solid geometry.
    ///
    /// Returns the translation actually applied.
    pub fn slide_collider(&mut self, collider: ColliderHandle, desired: Vec2) -> Vec2 {
        let Some(col) = self.collider_set.get(collider) else {
            return Vec2::ZERO;
        };
        let Some(parent) = col.parent() else {
            return Vec2::ZERO;
        };

        let controller = KinematicCharacterController::default();
        let filter = QueryFilter::new()
            .exclude_rigid_body(parent)
            .exclude_sensors()
            .groups(col.collision_groups());
        let ignored: Vec<ColliderHandle> = self
            .collider_set
            .iter()
            .filter(|(handle, _)| self.contact_filter.is_ignored(collider, *handle))
            .map(|(handle, _)| handle)
            .collect();
        let skip_ignored = |handle: ColliderHandle, _: &Collider| !ignored.contains(&handle);

        let movement = controller.move_shape(
            self.integration_parameters.dt,
            &self.rigid_body_set,
            &self.collider_set,
            &self.query_pipeline,
            col.shape(),
            col.position(),
            vector![desired.x, desired.y],
            filter.predicate(&skip_ignored),
            |_| {},
        );

        let applied = Vec2::new(movement.translation.x, movement.translation.y);
        if let Some(body) = self.rigid_body_set.get_mut(parent) {
            let next = body.translation() + movement.translation;
            body.set_translation(next, true);
        }
        applied
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    /// Get references to internal components for debug drawing
    pub fn debug_data(&self) -> DebugData<'_> {
        DebugData {
            rigid_bodies: &self.rigid_body_set,
            colliders: &self.collider_set,
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Data structure for debug drawing
pub struct DebugData<'a> {
    pub rigid_bodies: &'a RigidBodySet,
    pub colliders: &'a ColliderSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;

    fn floor(world: &mut PhysicsWorld) -> ColliderHandle {
        let body = world.add_rigid_body(presets::terrain_body(0.0, -0.5));
        world.add_collider(presets::terrain_collider(20.0, 1.0), body)
    }

    #[test]
    fn test_resting_body_reports_ground_contact() {
        let mut world = PhysicsWorld::new();
        let ground = floor(&mut world);
        let body = world.add_rigid_body(presets::knight_body(0.0, 0.5));
        let knight = world.add_collider(presets::knight_collider(Rect::from_center(Vec2::ZERO, Vec2::new(0.5, 1.0))), body);

        for _ in 0..60 {
            world.step();
        }

        let samples = world.contact_samples(knight);
        let (id, normal) = samples
            .iter()
            .copied()
            .find(|(id, _)| id.to_collider() == ground)
            .expect("knight should rest on the floor");
        assert_eq!(id, ContactId::from_collider(ground));
        assert!(normal.y > 0.9, "normal should point up, got {normal:?}");
    }

    #[test]
    fn test_intersections_filter_by_group() {
        let mut world = PhysicsWorld::new();
        floor(&mut world);
        let dummy_body = world.add_rigid_body(presets::terrain_body(2.0, 1.0));
        let dummy = world.add_collider(presets::hittable_collider(1.0, 2.0), dummy_body);
        world.step();

        let area = Rect::from_center(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0));
        assert_eq!(world.intersecting_colliders(area, CollisionGroups::Hittable), vec![dummy]);

        let empty = Rect::from_center(Vec2::new(-5.0, 3.0), Vec2::new(1.0, 1.0));
        assert!(world.intersecting_colliders(empty, CollisionGroups::Hittable).is_empty());
    }

    #[test]
    fn test_ignored_pair_round_trip() {
        let mut world = PhysicsWorld::new();
        let a = ColliderHandle::from_raw_parts(0, 0);
        let b = ColliderHandle::from_raw_parts(1, 0);
        world.set_pair_ignored(a, b, true);
        assert!(world.is_pair_ignored(b, a));
        world.set_pair_ignored(a, b, false);
        assert!(!world.is_pair_ignored(a, b));
    }
}
