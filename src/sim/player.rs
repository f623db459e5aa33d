//! Keyboard player controller
//!
//! Directional movement is an instantaneous position nudge on each key-down
//! event (so auto-repeat moves the player again), not continuous motion
//! while a key is held. The held-key flags are bookkeeping only.

use glam::Vec3;

use super::state::{GamePhase, GameState};
use crate::physics::PhysicsWorld;

/// Game actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
    ResetPosition,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value to a game action
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" | "ArrowLeft" => Some(Key::Left),
            "d" | "D" | "ArrowRight" => Some(Key::Right),
            " " => Some(Key::Jump),
            "r" | "R" => Some(Key::ResetPosition),
            _ => None,
        }
    }
}

/// Handle a key-down event. Ignored entirely once the run has ended.
pub fn key_down(state: &mut GameState, physics: &mut PhysicsWorld, key: Key) {
    if state.phase == GamePhase::Ended {
        return;
    }

    let handles = state.player.handles;
    match key {
        Key::Right => {
            state.keys.right = true;
            let mut pos = physics.position(handles);
            pos.x += state.tuning.nudge;
            physics.set_position(handles, pos, true);
        }
        Key::Left => {
            state.keys.left = true;
            let mut pos = physics.position(handles);
            pos.x -= state.tuning.nudge;
            physics.set_position(handles, pos, true);
        }
        Key::Jump => {
            state.keys.jump = true;
            // Approximate grounded check: near the plane counts, actual
            // contact is not consulted.
            let pos = physics.position(handles);
            if pos.y.abs() < state.tuning.grounded_threshold {
                let mut vel = physics.velocity(handles);
                vel.y = state.tuning.jump_velocity;
                physics.set_velocity(handles, vel, true);
            }
        }
        Key::ResetPosition => {
            // Position only; velocity and score are untouched
            physics.set_position(handles, Vec3::ZERO, true);
        }
    }
}

/// Handle a key-up event (flag bookkeeping only, in any phase)
pub fn key_up(state: &mut GameState, key: Key) {
    match key {
        Key::Left => state.keys.left = false,
        Key::Right => state.keys.right = false,
        Key::Jump => state.keys.jump = false,
        Key::ResetPosition => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn new_game(seed: u64) -> (GameState, PhysicsWorld) {
        let tuning = Tuning::default();
        let mut physics = PhysicsWorld::new(tuning.gravity);
        let state = GameState::new(seed, tuning, &mut physics);
        (state, physics)
    }

    #[test]
    fn dom_key_mapping() {
        assert_eq!(Key::from_dom_key("a"), Some(Key::Left));
        assert_eq!(Key::from_dom_key("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_dom_key(" "), Some(Key::Jump));
        assert_eq!(Key::from_dom_key("R"), Some(Key::ResetPosition));
        assert_eq!(Key::from_dom_key("Escape"), None);
    }

    #[test]
    fn each_key_down_nudges_by_a_fixed_increment() {
        let (mut state, mut physics) = new_game(1);

        key_down(&mut state, &mut physics, Key::Right);
        key_down(&mut state, &mut physics, Key::Right);
        assert!((physics.position(state.player.handles).x - 0.06).abs() < 1e-6);
        assert!(state.keys.right);

        key_down(&mut state, &mut physics, Key::Left);
        assert!((physics.position(state.player.handles).x - 0.03).abs() < 1e-6);
        assert!(state.keys.left);
    }

    #[test]
    fn grounded_jump_sets_vertical_velocity() {
        let (mut state, mut physics) = new_game(2);
        physics.set_position(state.player.handles, Vec3::ZERO, true);

        key_down(&mut state, &mut physics, Key::Jump);
        assert_eq!(physics.velocity(state.player.handles).y, 2.0);
        assert!(state.keys.jump);
    }

    #[test]
    fn airborne_jump_is_ignored() {
        let (mut state, mut physics) = new_game(3);
        physics.set_position(state.player.handles, Vec3::new(0.0, 3.0, 0.0), true);
        physics.set_velocity(state.player.handles, Vec3::new(0.0, -1.0, 0.0), true);

        key_down(&mut state, &mut physics, Key::Jump);
        assert_eq!(physics.velocity(state.player.handles).y, -1.0);
    }

    #[test]
    fn position_reset_keeps_velocity_and_score() {
        let (mut state, mut physics) = new_game(4);
        state.score = 5;
        physics.set_position(state.player.handles, Vec3::new(2.0, 1.0, -3.0), true);
        physics.set_velocity(state.player.handles, Vec3::new(0.5, 0.0, 0.0), true);

        key_down(&mut state, &mut physics, Key::ResetPosition);
        assert_eq!(physics.position(state.player.handles), Vec3::ZERO);
        assert_eq!(physics.velocity(state.player.handles), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(state.score, 5);
    }

    #[test]
    fn key_down_is_ignored_after_the_run_ends() {
        let (mut state, mut physics) = new_game(5);
        state.phase = GamePhase::Ended;

        key_down(&mut state, &mut physics, Key::Right);
        assert_eq!(physics.position(state.player.handles).x, 0.0);
        assert!(!state.keys.right);

        // Key-up bookkeeping still applies
        state.keys.jump = true;
        key_up(&mut state, Key::Jump);
        assert!(!state.keys.jump);
    }
}
