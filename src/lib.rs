//! Cube Dash - a 3D dodge-and-collect arcade game
//!
//! Core modules:
//! - `sim`: Game state, obstacle movement, collision resolution
//! - `physics`: rapier3d world wrapper (gravity, rigid bodies, contact events)
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance

pub mod physics;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep. One step per animation frame, so all
    /// per-frame increments are frame-rate dependent by design.
    pub const TICK_DT: f32 = 1.0 / 60.0;

    /// Camera placement; the mover respawns anything whose depth coordinate
    /// passes `CAMERA_EYE.z`.
    pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 5.0, 5.0);
    pub const CAMERA_TARGET: Vec3 = Vec3::ZERO;
    pub const CAMERA_FOV_DEG: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;

    /// Ground slab: body half-extents and resting height
    pub const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(15.0, 0.5, 15.0);
    pub const GROUND_Y: f32 = -1.0;

    /// Collision shapes
    pub const PLAYER_HALF_EXTENT: f32 = 0.25;
    pub const POWERUP_RADIUS: f32 = 0.2;
    pub const POWERUP_TUBE_RADIUS: f32 = 0.05;
    pub const ENEMY_HALF_EXTENT: f32 = 0.5;

    /// Entity collection sizes, fixed at startup
    pub const POWERUP_COUNT: usize = 10;
    pub const ENEMY_COUNT: usize = 3;

    /// Starfield particle cloud
    pub const STAR_COUNT: usize = 300;
    pub const STAR_FIELD_SIZE: f32 = 2000.0;
}
