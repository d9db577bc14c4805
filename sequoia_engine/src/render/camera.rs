/// Camera: view and projection used to render a viewport.
///
/// The view matrix is written by whoever drives the camera (usually a
/// camera controller attached to a scene node). The projection is a
/// perspective built from field of view, aspect ratio and clip planes;
/// the aspect ratio follows the viewport the camera is attached to.

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};

/// Camera shared between a viewport and its controller
pub type SharedCamera = Arc<Mutex<Camera>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view_matrix: Mat4,
    fov_y: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
}

impl Camera {
    /// Perspective camera looking down -Z from the origin
    ///
    /// `fov_y` is in radians.
    pub fn perspective(fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            fov_y,
            aspect,
            z_near,
            z_far,
        }
    }

    /// Wrap into a shareable handle
    pub fn shared(self) -> SharedCamera {
        Arc::new(Mutex::new(self))
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Right-handed OpenGL-style perspective projection
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix
    }

    /// World-space position, recovered from the view matrix
    pub fn eye(&self) -> Vec3 {
        self.view_matrix.inverse().w_axis.truncate()
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    // ===== SETTERS =====

    /// Set the view matrix.
    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    /// Point the camera from `eye` at `center`
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.view_matrix = Mat4::look_at_rh(eye, center, up);
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) {
        self.z_near = z_near;
        self.z_far = z_far;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 100.0)
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
