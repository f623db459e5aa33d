//! Game simulation
//!
//! Everything that decides what happens each frame lives here:
//! - Fixed timestep, one tick per animation frame
//! - Seeded RNG owned by the state (no globals)
//! - No rendering or DOM dependencies

pub mod obstacles;
pub mod player;
pub mod state;
pub mod tick;

pub use obstacles::{move_obstacles, random_range_int, random_spawn_position};
pub use player::{Key, key_down, key_up};
pub use state::{Entity, GamePhase, GameState, KeyStates, MeshInstance, MeshShape};
pub use tick::{reset, tick};
