//! Game state and entity types
//!
//! All mutable game state lives in [`GameState`]; there are no globals. The
//! physics world is authoritative for positions and orientations; every
//! [`MeshInstance`] is a derived visual proxy, synced from its body and never
//! the other way around.

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::obstacles::random_spawn_position;
use crate::consts::*;
use crate::physics::{BodyHandles, PhysicsWorld};
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Obstacles move, the player is controllable
    Running,
    /// An enemy was touched; terminal until an explicit reset
    Ended,
}

/// Renderable shape of a mesh instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    Cuboid { half_extents: Vec3 },
    Torus { radius: f32, tube_radius: f32 },
}

/// Visual proxy for a body: position/orientation snapshot plus a shape tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub position: Vec3,
    pub rotation: Quat,
    pub shape: MeshShape,
}

impl MeshInstance {
    pub fn new(position: Vec3, shape: MeshShape) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            shape,
        }
    }

    /// Copy position and orientation from the paired body
    pub fn sync_from(&mut self, physics: &PhysicsWorld, handles: BodyHandles) {
        self.position = physics.position(handles);
        self.rotation = physics.rotation(handles);
    }

    /// Copy position only, leaving the orientation as-is
    pub fn sync_position_from(&mut self, physics: &PhysicsWorld, handles: BodyHandles) {
        self.position = physics.position(handles);
    }
}

/// One body/mesh pair (the player, a powerup, or an enemy)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub handles: BodyHandles,
    pub mesh: MeshInstance,
}

impl Entity {
    pub fn sync_mesh(&mut self, physics: &PhysicsWorld) {
        self.mesh.sync_from(physics, self.handles);
    }
}

/// Press-state bookkeeping for the movement keys.
///
/// The flags track which keys are held but are not consumed by movement
/// logic: left/right motion is an instantaneous nudge on each key-down, not
/// continuous motion gated by held state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStates {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Complete game state
pub struct GameState {
    /// Powerups collected this run
    pub score: u32,
    pub phase: GamePhase,
    pub keys: KeyStates,
    /// Seeded RNG driving every respawn position
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub player: Entity,
    /// Exactly `POWERUP_COUNT` entries, never resized after startup
    pub powerups: Vec<Entity>,
    /// Exactly `ENEMY_COUNT` entries, never resized after startup
    pub enemies: Vec<Entity>,
    pub ground_mesh: MeshInstance,
}

impl GameState {
    /// Build the whole world: ground, player, and the fixed powerup and
    /// enemy collections. Nothing is ever constructed after this; respawns
    /// overwrite positions in place.
    pub fn new(seed: u64, tuning: Tuning, physics: &mut PhysicsWorld) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let ground_pos = Vec3::new(0.0, GROUND_Y, 0.0);
        physics.add_fixed_cuboid(ground_pos, GROUND_HALF_EXTENTS);
        let ground_mesh = MeshInstance::new(
            ground_pos,
            MeshShape::Cuboid {
                half_extents: GROUND_HALF_EXTENTS,
            },
        );

        let player_handles = physics.add_player(Vec3::ZERO, PLAYER_HALF_EXTENT);
        let player = Entity {
            handles: player_handles,
            mesh: MeshInstance::new(
                Vec3::ZERO,
                MeshShape::Cuboid {
                    half_extents: Vec3::splat(PLAYER_HALF_EXTENT),
                },
            ),
        };

        let mut powerups = Vec::with_capacity(POWERUP_COUNT);
        for _ in 0..POWERUP_COUNT {
            let pos = random_spawn_position(&mut rng, &tuning);
            let handles = physics.add_kinematic_ball(pos, POWERUP_RADIUS);
            powerups.push(Entity {
                handles,
                mesh: MeshInstance::new(
                    pos,
                    MeshShape::Torus {
                        radius: POWERUP_RADIUS,
                        tube_radius: POWERUP_TUBE_RADIUS,
                    },
                ),
            });
        }

        let mut enemies = Vec::with_capacity(ENEMY_COUNT);
        for _ in 0..ENEMY_COUNT {
            let pos = random_spawn_position(&mut rng, &tuning);
            let handles = physics.add_kinematic_cuboid(pos, ENEMY_HALF_EXTENT);
            enemies.push(Entity {
                handles,
                mesh: MeshInstance::new(
                    pos,
                    MeshShape::Cuboid {
                        half_extents: Vec3::splat(ENEMY_HALF_EXTENT),
                    },
                ),
            });
        }

        Self {
            score: 0,
            phase: GamePhase::Running,
            keys: KeyStates::default(),
            rng,
            tuning,
            player,
            powerups,
            enemies,
            ground_mesh,
        }
    }

    /// Text for the score display element, rewritten every frame
    pub fn hud_text(&self) -> String {
        match self.phase {
            GamePhase::Running => self.score.to_string(),
            GamePhase::Ended => format!("Game Over - Score: {}", self.score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game(seed: u64) -> (GameState, PhysicsWorld) {
        let tuning = Tuning::default();
        let mut physics = PhysicsWorld::new(tuning.gravity);
        let state = GameState::new(seed, tuning, &mut physics);
        (state, physics)
    }

    #[test]
    fn startup_builds_fixed_collections() {
        let (state, _physics) = new_game(7);
        assert_eq!(state.powerups.len(), POWERUP_COUNT);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.keys, KeyStates::default());
    }

    #[test]
    fn obstacles_start_inside_the_spawn_ranges() {
        let (state, physics) = new_game(42);
        for entity in state.powerups.iter().chain(state.enemies.iter()) {
            let pos = physics.position(entity.handles);
            assert!((-8.0..=8.0).contains(&pos.x), "x out of range: {}", pos.x);
            assert!((-10.0..=-5.0).contains(&pos.z), "z out of range: {}", pos.z);
            assert_eq!(pos.y, 0.0);
            assert_eq!(entity.mesh.position, pos);
        }
    }

    #[test]
    fn hud_text_tracks_phase() {
        let (mut state, _physics) = new_game(1);
        state.score = 12;
        assert_eq!(state.hud_text(), "12");
        state.phase = GamePhase::Ended;
        assert_eq!(state.hud_text(), "Game Over - Score: 12");
    }
}
