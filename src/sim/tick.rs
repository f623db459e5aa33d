//! Per-frame game loop
//!
//! One tick per animation frame: move obstacles, step physics (contact
//! events are resolved before the step result is acted on), then sync the
//! player mesh. The loop is a two-state machine: `Running` until an enemy is
//! touched, then `Ended` until an explicit reset.

use glam::Vec3;
use rapier3d::prelude::ColliderHandle;

use super::obstacles::{move_obstacles, random_spawn_position};
use super::state::{GamePhase, GameState};
use crate::consts::TICK_DT;
use crate::physics::PhysicsWorld;

/// Advance the game by one frame
pub fn tick(state: &mut GameState, physics: &mut PhysicsWorld) {
    // The player must never sleep: contacts with teleported obstacles have
    // to fire on the frame they happen.
    physics.wake(state.player.handles);

    match state.phase {
        GamePhase::Running => {
            let spawn_x = state.tuning.spawn_x;
            let spawn_z = state.tuning.spawn_z;
            let powerup_speed = state.tuning.powerup_speed;
            let enemy_speed = state.tuning.enemy_speed;
            move_obstacles(
                &mut state.powerups,
                physics,
                &mut state.rng,
                powerup_speed,
                spawn_x,
                spawn_z,
            );
            move_obstacles(
                &mut state.enemies,
                physics,
                &mut state.rng,
                enemy_speed,
                spawn_x,
                spawn_z,
            );
        }
        GamePhase::Ended => {
            // Knockback is force-set every frame, not once, so it overrides
            // gravity and damping for as long as the run stays ended.
            let knockback = state.tuning.knockback_velocity;
            physics.set_velocity(state.player.handles, knockback, true);
        }
    }

    let contacts = physics.step(TICK_DT);
    for (a, b) in contacts {
        resolve_contact(state, physics, a, b);
    }

    state.player.sync_mesh(physics);
}

/// Handle one started contact pair. Only pairs involving the player matter;
/// the other collider is matched against the powerup list, then the enemy
/// list (the two sets are disjoint by construction). Safe to call once per
/// touching pair within a single step.
fn resolve_contact(
    state: &mut GameState,
    physics: &mut PhysicsWorld,
    a: ColliderHandle,
    b: ColliderHandle,
) {
    let player = state.player.handles.collider;
    let other = if a == player {
        b
    } else if b == player {
        a
    } else {
        return;
    };

    for i in 0..state.powerups.len() {
        if state.powerups[i].handles.collider == other {
            let pos = random_spawn_position(&mut state.rng, &state.tuning);
            physics.set_position(state.powerups[i].handles, pos, true);
            state.powerups[i].sync_mesh(physics);
            state.score += 1;
        }
    }

    for enemy in &state.enemies {
        if enemy.handles.collider == other {
            state.phase = GamePhase::Ended;
        }
    }
}

/// Replay reset: back to `Running` with score 0, the player parked at the
/// origin with zero velocity, and every obstacle at a fresh random spot.
pub fn reset(state: &mut GameState, physics: &mut PhysicsWorld) {
    state.phase = GamePhase::Running;
    state.score = 0;

    let handles = state.player.handles;
    physics.set_position(handles, Vec3::ZERO, true);
    physics.set_velocity(handles, Vec3::ZERO, true);
    physics.set_angular_velocity(handles, Vec3::ZERO, true);
    physics.wake(handles);
    state.player.sync_mesh(physics);

    for i in 0..state.powerups.len() {
        let pos = random_spawn_position(&mut state.rng, &state.tuning);
        physics.set_position(state.powerups[i].handles, pos, true);
        // Known asymmetry: this path syncs mesh position only, while the
        // collision respawn path syncs orientation too.
        let entity = &mut state.powerups[i];
        entity.mesh.sync_position_from(physics, entity.handles);
    }
    for i in 0..state.enemies.len() {
        let pos = random_spawn_position(&mut state.rng, &state.tuning);
        physics.set_position(state.enemies[i].handles, pos, true);
        let entity = &mut state.enemies[i];
        entity.mesh.sync_position_from(physics, entity.handles);
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

    fn in_spawn_bounds(pos: Vec3) -> bool {
        (-8.0..=8.0).contains(&pos.x) && (-10.0..=-5.0).contains(&pos.z)
    }

    #[test]
    fn powerup_contact_scores_and_respawns() {
        let (mut state, mut physics) = new_game(11);
        let powerup = state.powerups[0].handles;
        physics.set_position(powerup, Vec3::ZERO, true);

        tick(&mut state, &mut physics);

        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Running);
        let pos = physics.position(powerup);
        assert!(in_spawn_bounds(pos), "powerup not respawned: {pos}");
        assert_eq!(state.powerups[0].mesh.position, pos);
    }

    #[test]
    fn enemy_contact_ends_the_run() {
        let (mut state, mut physics) = new_game(12);
        let enemy = state.enemies[0].handles;
        physics.set_position(enemy, Vec3::ZERO, true);

        tick(&mut state, &mut physics);

        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.hud_text(), "Game Over - Score: 0");
    }

    #[test]
    fn simultaneous_contacts_are_each_delivered() {
        let (mut state, mut physics) = new_game(13);
        physics.set_position(state.powerups[0].handles, Vec3::ZERO, true);
        physics.set_position(state.enemies[0].handles, Vec3::new(0.3, 0.0, 0.0), true);

        tick(&mut state, &mut physics);

        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn obstacles_freeze_once_ended() {
        let (mut state, mut physics) = new_game(14);
        state.phase = GamePhase::Ended;
        let before: Vec<Vec3> = state
            .powerups
            .iter()
            .chain(state.enemies.iter())
            .map(|e| physics.position(e.handles))
            .collect();

        tick(&mut state, &mut physics);

        let after: Vec<Vec3> = state
            .powerups
            .iter()
            .chain(state.enemies.iter())
            .map(|e| physics.position(e.handles))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn knockback_is_reapplied_every_frame() {
        let (mut state, mut physics) = new_game(15);
        state.phase = GamePhase::Ended;

        for _ in 0..10 {
            tick(&mut state, &mut physics);
        }

        // Gravity only gets one step between re-applications, so vertical
        // velocity stays near 2 instead of decaying toward free fall.
        let vel = physics.velocity(state.player.handles);
        assert!(vel.y > 1.8, "knockback not re-applied: {vel}");
        assert!((vel.z - 2.0).abs() < 0.2);
    }

    #[test]
    fn score_is_monotonic_while_running() {
        let (mut state, mut physics) = new_game(16);
        let mut last = 0;
        for _ in 0..240 {
            tick(&mut state, &mut physics);
            if state.phase != GamePhase::Running {
                break;
            }
            assert!(state.score >= last);
            last = state.score;
        }
    }

    #[test]
    fn ended_is_terminal_until_reset() {
        let (mut state, mut physics) = new_game(17);
        state.phase = GamePhase::Ended;

        for _ in 0..30 {
            tick(&mut state, &mut physics);
            assert_eq!(state.phase, GamePhase::Ended);
        }

        reset(&mut state, &mut physics);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn reset_is_idempotent() {
        let (mut state, mut physics) = new_game(18);
        state.score = 9;
        state.phase = GamePhase::Ended;
        physics.set_position(state.player.handles, Vec3::new(1.0, 4.0, 2.0), true);
        physics.set_velocity(state.player.handles, Vec3::new(0.0, 2.0, 2.0), true);

        reset(&mut state, &mut physics);
        reset(&mut state, &mut physics);

        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(physics.position(state.player.handles), Vec3::ZERO);
        assert_eq!(physics.velocity(state.player.handles), Vec3::ZERO);
        for entity in state.powerups.iter().chain(state.enemies.iter()) {
            assert!(in_spawn_bounds(physics.position(entity.handles)));
        }
    }

    #[test]
    fn reset_syncs_obstacle_mesh_position_only() {
        let (mut state, mut physics) = new_game(19);
        let stale = glam::Quat::from_rotation_y(0.5);
        state.powerups[0].mesh.rotation = stale;

        reset(&mut state, &mut physics);

        let entity = &state.powerups[0];
        assert_eq!(entity.mesh.position, physics.position(entity.handles));
        assert_eq!(entity.mesh.rotation, stale);
    }
}
