/// Transform: position, orientation and uniform scale of a scene node.
///
/// The model matrix is cached and recomputed lazily: every mutation marks
/// it dirty, the next `model_matrix()` call rebuilds it as
/// `translation * rotation * scale`.

use std::fmt;
use glam::{Mat3, Mat4, Quat, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec3,
    orientation: Quat,
    scale: f32,
    model_matrix: Mat4,
    dirty: bool,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 1.0,
            model_matrix: Mat4::IDENTITY,
            dirty: true,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        let mut transform = Self::new();
        transform.position = position;
        transform
    }

    // ===== ACCESSORS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.dirty = true;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.dirty = true;
    }

    /// True if the model matrix must be recomputed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Model matrix, recomputed if position, orientation or scale changed
    pub fn model_matrix(&mut self) -> &Mat4 {
        if self.dirty {
            self.model_matrix = Mat4::from_scale_rotation_translation(
                Vec3::splat(self.scale),
                self.orientation,
                self.position,
            );
            self.dirty = false;
        }
        &self.model_matrix
    }

    // ===== MOVEMENT =====

    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// Apply `rotation` on top of the current orientation
    pub fn rotate(&mut self, rotation: Quat) {
        // Renormalize to avoid drift
        self.set_orientation((rotation * self.orientation).normalize());
    }

    /// Rotate by `angle` radians around `axis`
    pub fn rotate_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotate(Quat::from_axis_angle(axis.normalize(), angle));
    }

    /// Rotate around the Z axis
    pub fn roll(&mut self, angle: f32) {
        self.rotate_axis(Vec3::Z, angle);
    }

    /// Rotate around the X axis
    pub fn pitch(&mut self, angle: f32) {
        self.rotate_axis(Vec3::X, angle);
    }

    /// Rotate around the Y axis
    pub fn yaw(&mut self, angle: f32) {
        self.rotate_axis(Vec3::Y, angle);
    }

    pub fn reset_orientation(&mut self) {
        self.set_orientation(Quat::IDENTITY);
    }

    /// Local X, Y and Z axes as the columns of a matrix
    pub fn local_axes(&self) -> Mat3 {
        Mat3::from_cols(
            self.orientation * Vec3::X,
            self.orientation * Vec3::Y,
            self.orientation * Vec3::Z,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position = {}, orientation = {}, scale = {}",
            self.position, self.orientation, self.scale
        )
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
