//! CPU mesh emission
//!
//! The whole scene is rebuilt as one triangle list every frame, in world
//! space, with flat directional shading baked into the vertex colors. The
//! shader only has to transform and fog.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::consts::{CAMERA_EYE, STAR_COUNT, STAR_FIELD_SIZE};
use crate::sim::{GameState, MeshInstance, MeshShape};

pub const TORUS_MAJOR_SEGMENTS: usize = 24;
pub const TORUS_MINOR_SEGMENTS: usize = 8;

fn light_dir() -> Vec3 {
    Vec3::new(5.0, 10.0, 7.0).normalize()
}

/// Flat Lambert shading against the fixed directional light
fn shade(color: [f32; 4], normal: Vec3) -> [f32; 4] {
    let lambert = normal.dot(light_dir()).max(0.0);
    let lum = 0.35 + 0.65 * lambert;
    [color[0] * lum, color[1] * lum, color[2] * lum, color[3]]
}

/// Emit a cuboid as 12 triangles (36 vertices), one shade per face
pub fn push_cuboid(
    out: &mut Vec<Vertex>,
    position: Vec3,
    rotation: Quat,
    half_extents: Vec3,
    color: [f32; 4],
) {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::Z),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::X, Vec3::Y),
    ];

    for (n, u, v) in faces {
        let shaded = shade(color, rotation * n);
        let quad = [
            n - u - v,
            n + u - v,
            n + u + v,
            n - u - v,
            n + u + v,
            n - u + v,
        ];
        for corner in quad {
            let p = position + rotation * (corner * half_extents);
            out.push(Vertex::new(p.x, p.y, p.z, shaded));
        }
    }
}

/// Emit a torus lying in the local XY plane (ring axis +Z), one shade per
/// quad
pub fn push_torus(
    out: &mut Vec<Vertex>,
    position: Vec3,
    rotation: Quat,
    radius: f32,
    tube_radius: f32,
    color: [f32; 4],
) {
    let surface = |u: f32, v: f32| -> (Vec3, Vec3) {
        let normal = Vec3::new(u.cos() * v.cos(), u.sin() * v.cos(), v.sin());
        let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
        (center + tube_radius * normal, normal)
    };

    for i in 0..TORUS_MAJOR_SEGMENTS {
        for j in 0..TORUS_MINOR_SEGMENTS {
            let u0 = i as f32 / TORUS_MAJOR_SEGMENTS as f32 * TAU;
            let u1 = (i + 1) as f32 / TORUS_MAJOR_SEGMENTS as f32 * TAU;
            let v0 = j as f32 / TORUS_MINOR_SEGMENTS as f32 * TAU;
            let v1 = (j + 1) as f32 / TORUS_MINOR_SEGMENTS as f32 * TAU;

            let (p00, _) = surface(u0, v0);
            let (p10, _) = surface(u1, v0);
            let (p11, _) = surface(u1, v1);
            let (p01, _) = surface(u0, v1);
            let (_, mid_normal) = surface((u0 + u1) / 2.0, (v0 + v1) / 2.0);

            let shaded = shade(color, rotation * mid_normal);
            for local in [p00, p10, p11, p00, p11, p01] {
                let p = position + rotation * local;
                out.push(Vertex::new(p.x, p.y, p.z, shaded));
            }
        }
    }
}

fn push_mesh(out: &mut Vec<Vertex>, mesh: &MeshInstance, color: [f32; 4]) {
    match mesh.shape {
        MeshShape::Cuboid { half_extents } => {
            push_cuboid(out, mesh.position, mesh.rotation, half_extents, color);
        }
        MeshShape::Torus {
            radius,
            tube_radius,
        } => {
            push_torus(out, mesh.position, mesh.rotation, radius, tube_radius, color);
        }
    }
}

/// Slowly rotating particle cloud in the far background. Built once from
/// the seeded RNG; only the whole-cloud rotation changes per frame.
pub struct Starfield {
    points: Vec<Vec3>,
    rotation: Vec3,
}

impl Starfield {
    pub fn new(rng: &mut impl Rng) -> Self {
        let size = STAR_FIELD_SIZE;
        let mut sample =
            || (rng.random::<f32>() * size + rng.random::<f32>() * size) / 2.0 - size / 2.0;
        let points = (0..STAR_COUNT)
            .map(|_| {
                let x = sample();
                let y = sample();
                let z = sample();
                Vec3::new(x, y, z)
            })
            .collect();
        Self {
            points,
            rotation: Vec3::ZERO,
        }
    }

    /// Per-frame rotation increment (frame-rate dependent, like the rest of
    /// the per-frame motion)
    pub fn advance(&mut self) {
        self.rotation += Vec3::new(0.0002, 0.0002, 0.0005);
    }

    pub fn emit(&self, out: &mut Vec<Vertex>) {
        let rot = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        for &point in &self.points {
            let p = rot * point;
            // Size scales with distance so stars stay roughly pixel-sized
            let s = (p - CAMERA_EYE).length() * 0.004;
            out.push(Vertex::new(p.x - s, p.y - s * 0.5, p.z, colors::STAR));
            out.push(Vertex::new(p.x + s, p.y - s * 0.5, p.z, colors::STAR));
            out.push(Vertex::new(p.x, p.y + s, p.z, colors::STAR));
        }
    }
}

/// Assemble the full frame: ground, player, powerups, enemies, starfield
pub fn build_frame(state: &GameState, starfield: &Starfield) -> Vec<Vertex> {
    let torus_vertices = TORUS_MAJOR_SEGMENTS * TORUS_MINOR_SEGMENTS * 6;
    let mut out = Vec::with_capacity(
        36 * (2 + state.enemies.len()) + torus_vertices * state.powerups.len() + STAR_COUNT * 3,
    );

    push_mesh(&mut out, &state.ground_mesh, colors::GROUND);
    push_mesh(&mut out, &state.player.mesh, colors::PLAYER);
    for powerup in &state.powerups {
        push_mesh(&mut out, &powerup.mesh, colors::POWERUP);
    }
    for enemy in &state.enemies {
        push_mesh(&mut out, &enemy.mesh, colors::ENEMY);
    }
    starfield.emit(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ENEMY_COUNT, POWERUP_COUNT};
    use crate::physics::PhysicsWorld;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn cuboid_emits_36_vertices_inside_its_bounds() {
        let mut out = Vec::new();
        let half = Vec3::new(0.25, 0.25, 0.25);
        push_cuboid(&mut out, Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, half, colors::PLAYER);

        assert_eq!(out.len(), 36);
        for v in &out {
            let p = Vec3::from(v.position) - Vec3::new(1.0, 2.0, 3.0);
            assert!(p.length() <= half.length() + 1e-5);
            assert_eq!(v.color[3], 1.0);
        }
    }

    #[test]
    fn torus_emits_expected_triangle_count() {
        let mut out = Vec::new();
        push_torus(&mut out, Vec3::ZERO, Quat::IDENTITY, 0.2, 0.05, colors::POWERUP);
        assert_eq!(out.len(), TORUS_MAJOR_SEGMENTS * TORUS_MINOR_SEGMENTS * 6);

        for v in &out {
            let p = Vec3::from(v.position);
            assert!(p.length() <= 0.25 + 1e-5);
        }
    }

    #[test]
    fn frame_covers_every_entity() {
        let tuning = Tuning::default();
        let mut physics = PhysicsWorld::new(tuning.gravity);
        let state = GameState::new(5, tuning, &mut physics);
        let starfield = Starfield::new(&mut Pcg32::seed_from_u64(5));

        let frame = build_frame(&state, &starfield);
        let torus_vertices = TORUS_MAJOR_SEGMENTS * TORUS_MINOR_SEGMENTS * 6;
        let expected =
            36 * (2 + ENEMY_COUNT) + torus_vertices * POWERUP_COUNT + STAR_COUNT * 3;
        assert_eq!(frame.len(), expected);
    }
}
