//! Obstacle movement and respawn
//!
//! Obstacles drift along +z toward the camera by a fixed amount per call.
//! The mover runs once per animation frame, so the speeds are per-frame
//! increments and the drift rate is frame-rate dependent by design.

use glam::Vec3;
use rand::Rng;

use super::state::Entity;
use crate::consts::CAMERA_EYE;
use crate::physics::PhysicsWorld;
use crate::tuning::{SpawnRange, Tuning};

/// Uniform random integer from an inclusive range. The range bounds are
/// normalized first, so callers may pass them in either order; the effective
/// ranges are pinned down by the tests, not by argument naming.
pub fn random_range_int(rng: &mut impl Rng, range: SpawnRange) -> i32 {
    let (lo, hi) = range.ordered();
    rng.random_range(lo..=hi)
}

/// Fresh spawn position on the plane: random x and z, y = 0
pub fn random_spawn_position(rng: &mut impl Rng, tuning: &Tuning) -> Vec3 {
    Vec3::new(
        random_range_int(rng, tuning.spawn_x) as f32,
        0.0,
        random_range_int(rng, tuning.spawn_z) as f32,
    )
}

/// Advance each entity's depth coordinate by `speed`; teleport any entity
/// that has passed the camera back to a random spot inside the spawn ranges.
/// Every entity's mesh is re-synced (position and orientation) afterwards.
pub fn move_obstacles(
    entities: &mut [Entity],
    physics: &mut PhysicsWorld,
    rng: &mut impl Rng,
    speed: f32,
    spawn_x: SpawnRange,
    spawn_z: SpawnRange,
) {
    for entity in entities.iter_mut() {
        let mut pos = physics.position(entity.handles);
        pos.z += speed;
        if pos.z > CAMERA_EYE.z {
            pos.x = random_range_int(rng, spawn_x) as f32;
            pos.z = random_range_int(rng, spawn_z) as f32;
        }
        physics.set_position(entity.handles, pos, true);
        entity.sync_mesh(physics);
    }
}
