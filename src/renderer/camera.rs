//! Perspective camera
//!
//! Fixed eye above and behind the play field, looking at the origin. Only
//! the aspect ratio changes at runtime (on window resize).

use glam::{Mat4, Vec3};

use crate::consts::*;

pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub aspect: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: CAMERA_EYE,
            target: CAMERA_TARGET,
            aspect: width as f32 / height.max(1) as f32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Combined view-projection matrix for the uniform buffer
    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(
            CAMERA_FOV_DEG.to_radians(),
            self.aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_aspect() {
        let mut camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);

        camera.resize(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);

        // Degenerate sizes are ignored
        camera.resize(0, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_inside_the_frustum() {
        let camera = Camera::new(1280, 720);
        let clip = camera.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
        assert!(clip.x.abs() <= clip.w);
        assert!(clip.y.abs() <= clip.w);
        assert!(clip.z >= 0.0 && clip.z <= clip.w);
    }
}
