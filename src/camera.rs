//! Fixed perspective camera with NDC ray unprojection for picking.

use glam::{Mat4, Vec2, Vec3};

use crate::params::{RenderConfig, SceneLayout};

/// Camera system: a stationary eye looking across the landscape.
pub struct CameraSystem {
    pub eye: Vec3,
    pub target: Vec3,
    fov_degrees: f32,
    near_plane: f32,
    far_plane: f32,
    aspect: f32,
}

impl CameraSystem {
    /// Create the camera from the scene layout and render configuration
    pub fn new(layout: &SceneLayout, render_config: &RenderConfig) -> Self {
        Self {
            eye: Vec3::from_array(layout.camera_eye),
            target: Vec3::from_array(layout.camera_target),
            fov_degrees: render_config.fov_degrees,
            near_plane: render_config.near_plane,
            far_plane: render_config.far_plane,
            aspect: render_config.aspect_ratio(),
        }
    }

    /// Track a window resize
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// View-projection matrix for rendering (Y up, camera never rolls)
    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near_plane,
            self.far_plane,
        );
        proj * view
    }

    /// Cast a ray from the eye through a normalized-device-coordinate
    /// point on the near plane. Returns (origin, unit direction).
    pub fn unproject_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inverse = self.view_proj().inverse();
        // wgpu clip space puts the near plane at depth 0
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        (self.eye, (far - near).normalize())
    }
}
