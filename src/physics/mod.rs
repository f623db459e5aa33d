//! rapier3d world wrapper
//!
//! Owns every rapier resource the game needs: the body/collider sets, the
//! stepping pipelines, and the collision event channel. The sim only talks
//! to bodies through glam vectors and the handles returned at creation.
//!
//! Contact delivery contract: `step` drains rapier's event channel before
//! returning, so by the time the caller sees the started-contact list, the
//! physics step for that frame is fully settled.

use glam::{Quat, Vec3};
use rapier3d::crossbeam;
use rapier3d::prelude::*;

/// A rigid body plus its collider, as one handle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// The physics world and stepping machinery
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    events: ChannelEventCollector,
    collision_recv: crossbeam::channel::Receiver<CollisionEvent>,
    contact_force_recv: crossbeam::channel::Receiver<ContactForceEvent>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        let (collision_send, collision_recv) = crossbeam::channel::unbounded();
        let (contact_force_send, contact_force_recv) = crossbeam::channel::unbounded();

        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: vector![gravity.x, gravity.y, gravity.z],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            events: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_recv,
            contact_force_recv,
        }
    }

    /// Immovable cuboid (the ground slab)
    pub fn add_fixed_cuboid(&mut self, position: Vec3, half_extents: Vec3) -> BodyHandles {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .build();
        let handle = self.bodies.insert(body);
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandles {
            body: handle,
            collider,
        }
    }

    /// The player: dynamic, unit mass, rotations locked so it cannot tip over.
    /// Collision events are enabled on its collider, so every contact pair
    /// involving the player reaches the resolver.
    pub fn add_player(&mut self, position: Vec3, half_extent: f32) -> BodyHandles {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .lock_rotations()
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half_extent, half_extent, half_extent)
            .mass(1.0)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandles {
            body: handle,
            collider,
        }
    }

    /// Kinematic sphere (powerup). Moved by teleporting its translation.
    pub fn add_kinematic_ball(&mut self, position: Vec3, radius: f32) -> BodyHandles {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, position.z])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(radius).build();
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandles {
            body: handle,
            collider,
        }
    }

    /// Kinematic cuboid (enemy). Moved by teleporting its translation.
    pub fn add_kinematic_cuboid(&mut self, position: Vec3, half_extent: f32) -> BodyHandles {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, position.z])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half_extent, half_extent, half_extent).build();
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandles {
            body: handle,
            collider,
        }
    }

    /// Advance the simulation by `dt` and return the contact pairs that
    /// started during this step. The event channel is fully drained before
    /// returning; cross-pair ordering is deterministic per input but
    /// otherwise unspecified.
    pub fn step(&mut self, dt: f32) -> Vec<(ColliderHandle, ColliderHandle)> {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.events,
        );

        let mut started = Vec::new();
        while let Ok(event) = self.collision_recv.try_recv() {
            if let CollisionEvent::Started(a, b, _) = event {
                started.push((a, b));
            }
        }
        while self.contact_force_recv.try_recv().is_ok() {}
        started
    }

    pub fn position(&self, handles: BodyHandles) -> Vec3 {
        let t = self.bodies[handles.body].translation();
        Vec3::new(t.x, t.y, t.z)
    }

    pub fn set_position(&mut self, handles: BodyHandles, position: Vec3, wake_up: bool) {
        self.bodies[handles.body]
            .set_translation(vector![position.x, position.y, position.z], wake_up);
    }

    pub fn rotation(&self, handles: BodyHandles) -> Quat {
        let r = self.bodies[handles.body].rotation();
        Quat::from_xyzw(r.i, r.j, r.k, r.w)
    }

    pub fn velocity(&self, handles: BodyHandles) -> Vec3 {
        let v = self.bodies[handles.body].linvel();
        Vec3::new(v.x, v.y, v.z)
    }

    pub fn set_velocity(&mut self, handles: BodyHandles, velocity: Vec3, wake_up: bool) {
        self.bodies[handles.body]
            .set_linvel(vector![velocity.x, velocity.y, velocity.z], wake_up);
    }

    pub fn set_angular_velocity(&mut self, handles: BodyHandles, angvel: Vec3, wake_up: bool) {
        self.bodies[handles.body].set_angvel(vector![angvel.x, angvel.y, angvel.z], wake_up);
    }

    pub fn wake(&mut self, handles: BodyHandles) {
        self.bodies[handles.body].wake_up(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_DT;

    #[test]
    fn gravity_pulls_a_dynamic_body_down() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -5.0, 0.0));
        let player = world.add_player(Vec3::new(0.0, 3.0, 0.0), 0.25);

        for _ in 0..30 {
            world.step(TICK_DT);
        }

        assert!(world.position(player).y < 3.0);
        assert!(world.velocity(player).y < 0.0);
    }

    #[test]
    fn overlap_with_player_reports_a_started_contact() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let player = world.add_player(Vec3::ZERO, 0.25);
        let powerup = world.add_kinematic_ball(Vec3::new(0.1, 0.0, 0.0), 0.2);

        let contacts = world.step(TICK_DT);
        let involves_both = contacts.iter().any(|&(a, b)| {
            (a == player.collider && b == powerup.collider)
                || (a == powerup.collider && b == player.collider)
        });
        assert!(involves_both, "expected a player/powerup contact");
    }

    #[test]
    fn teleported_body_reports_new_translation() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let enemy = world.add_kinematic_cuboid(Vec3::new(2.0, 0.0, -7.0), 0.5);

        world.set_position(enemy, Vec3::new(-4.0, 0.0, -9.0), true);
        assert_eq!(world.position(enemy), Vec3::new(-4.0, 0.0, -9.0));
        assert_eq!(world.rotation(enemy), Quat::IDENTITY);
    }
}
