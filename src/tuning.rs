//! Data-driven game balance
//!
//! Gameplay numbers live in `tuning.json` (embedded at compile time) so they
//! can be tweaked without touching sim code. A parse failure falls back to
//! the built-in defaults.

use glam::Vec3;
use serde::Deserialize;

/// Inclusive integer range for obstacle respawn coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpawnRange {
    pub min: i32,
    pub max: i32,
}

impl SpawnRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Normalized (lo, hi) pair regardless of the order the fields carry
    pub fn ordered(&self) -> (i32, i32) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// World gravity
    pub gravity: Vec3,
    /// Powerup drift toward the camera, units per frame
    pub powerup_speed: f32,
    /// Enemy drift toward the camera, units per frame
    pub enemy_speed: f32,
    /// Horizontal respawn range for obstacles
    pub spawn_x: SpawnRange,
    /// Depth respawn range for obstacles
    pub spawn_z: SpawnRange,
    /// Player displacement per left/right key-down
    pub nudge: f32,
    /// Vertical velocity applied by a grounded jump
    pub jump_velocity: f32,
    /// |y| below which the player counts as grounded
    pub grounded_threshold: f32,
    /// Velocity force-set on the player every frame after a run ends
    pub knockback_velocity: Vec3,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -5.0, 0.0),
            powerup_speed: 0.025,
            enemy_speed: 0.04,
            spawn_x: SpawnRange::new(-8, 8),
            spawn_z: SpawnRange::new(-10, -5),
            nudge: 0.03,
            jump_velocity: 2.0,
            grounded_threshold: 0.5,
            knockback_velocity: Vec3::new(0.0, 2.0, 2.0),
        }
    }
}

impl Tuning {
    /// Load the embedded tuning file, falling back to defaults on error
    pub fn load() -> Self {
        match serde_json::from_str(include_str!("tuning.json")) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Failed to parse tuning.json, using defaults: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tuning_parses() {
        let tuning: Tuning =
            serde_json::from_str(include_str!("tuning.json")).expect("tuning.json must parse");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn spawn_range_ordering_is_normalized() {
        assert_eq!(SpawnRange::new(8, -8).ordered(), (-8, 8));
        assert_eq!(SpawnRange::new(-10, -5).ordered(), (-10, -5));
    }

    #[test]
    fn garbage_input_falls_back_cleanly() {
        let parsed: Result<Tuning, _> = serde_json::from_str("{\"gravity\": \"sideways\"}");
        assert!(parsed.is_err());
    }
}
