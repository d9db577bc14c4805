/// Camera controllers: capabilities binding a camera to a scene node.
///
/// On every update the controller writes its node's world transform into
/// the camera's view matrix. The free-flying variant additionally moves
/// and rotates the node from accumulated keyboard and mouse input.

use std::fmt;
use glam::{EulerRot, Quat, Vec3};
use winit::keyboard::KeyCode;
use crate::error::{Error, Result};
use crate::render::SharedCamera;
use super::capability::{impl_capability, CapabilityKind, UpdateContext};
use super::transform::Transform;

/// Keys driving a free-flying camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::Space,
            down: KeyCode::KeyC,
        }
    }
}

/// Movement state of a free-flying camera
#[derive(Debug, Clone, PartialEq)]
pub struct FreeFlight {
    keymap: Keymap,
    move_speed: f32,
    rotation_speed: f32,
    going_forward: bool,
    going_back: bool,
    going_left: bool,
    going_right: bool,
    going_up: bool,
    going_down: bool,
    angles_synced: bool,
    rotation_pending: bool,
    yaw_offset: f32,
    pitch_offset: f32,
    /// Degrees in [0, 360)
    yaw: f32,
    /// Degrees in [0, 360)
    pitch: f32,
}

impl FreeFlight {
    fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            move_speed: 5.0,
            rotation_speed: 1.0,
            going_forward: false,
            going_back: false,
            going_left: false,
            going_right: false,
            going_up: false,
            going_down: false,
            angles_synced: false,
            rotation_pending: false,
            yaw_offset: 0.0,
            pitch_offset: 0.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    fn is_moving(&self) -> bool {
        self.going_forward
            || self.going_back
            || self.going_left
            || self.going_right
            || self.going_up
            || self.going_down
    }

    fn keyboard_event(&mut self, key: KeyCode, pressed: bool) {
        let keymap = self.keymap;
        let flag = if key == keymap.forward {
            &mut self.going_forward
        } else if key == keymap.backward {
            &mut self.going_back
        } else if key == keymap.right {
            &mut self.going_right
        } else if key == keymap.left {
            &mut self.going_left
        } else if key == keymap.up {
            &mut self.going_up
        } else if key == keymap.down {
            &mut self.going_down
        } else {
            return;
        };
        *flag = pressed;
    }

    fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.yaw_offset += dx;
        self.pitch_offset += dy;
        self.rotation_pending = true;
    }

    fn apply(&mut self, time_step: f32, transform: &mut Transform) {
        if !self.angles_synced {
            // Start from the node's current orientation
            let (x, y, _) = transform.orientation().to_euler(EulerRot::XYZ);
            self.pitch = wrap_degrees(-x.to_degrees());
            self.yaw = wrap_degrees(-y.to_degrees());
            self.angles_synced = true;
        }

        if self.is_moving() {
            let axes = transform.local_axes();
            let mut direction = Vec3::ZERO;
            if self.going_forward {
                direction -= axes.z_axis;
            }
            if self.going_back {
                direction += axes.z_axis;
            }
            if self.going_right {
                direction += axes.x_axis;
            }
            if self.going_left {
                direction -= axes.x_axis;
            }
            if self.going_up {
                direction += axes.y_axis;
            }
            if self.going_down {
                direction -= axes.y_axis;
            }
            if direction != Vec3::ZERO {
                transform.translate(self.move_speed * time_step * direction.normalize());
            }
        }

        if self.rotation_pending {
            let scale = self.rotation_speed * time_step;
            self.yaw = wrap_degrees(self.yaw + self.yaw_offset * scale);
            self.pitch = wrap_degrees(self.pitch + self.pitch_offset * scale);
            transform.set_orientation(Quat::from_euler(
                EulerRot::XYZ,
                (-self.pitch).to_radians(),
                (-self.yaw).to_radians(),
                0.0,
            ));
            self.rotation_pending = false;
            self.yaw_offset = 0.0;
            self.pitch_offset = 0.0;
        }
    }
}

fn wrap_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Capability driving a camera from its node
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Option<SharedCamera>,
    free: Option<FreeFlight>,
}

impl CameraController {
    /// Camera following the node
    pub fn fixed(camera: SharedCamera) -> Self {
        Self { camera: Some(camera), free: None }
    }

    /// Free-flying camera with the default keymap (W/S/A/D, Space, C)
    pub fn free(camera: SharedCamera) -> Self {
        Self::free_with_keymap(camera, Keymap::default())
    }

    pub fn free_with_keymap(camera: SharedCamera, keymap: Keymap) -> Self {
        Self {
            camera: Some(camera),
            free: Some(FreeFlight::new(keymap)),
        }
    }

    pub fn camera(&self) -> Option<&SharedCamera> {
        self.camera.as_ref()
    }

    /// Attach a camera; a free camera re-reads its angles from the node
    pub fn set_camera(&mut self, camera: SharedCamera) {
        self.camera = Some(camera);
        if let Some(free) = &mut self.free {
            free.angles_synced = false;
            free.rotation_pending = true;
        }
    }

    pub fn remove_camera(&mut self) -> Option<SharedCamera> {
        self.camera.take()
    }

    pub fn is_free(&self) -> bool {
        self.free.is_some()
    }

    /// Units per second, free cameras only
    pub fn set_move_speed(&mut self, speed: f32) {
        if let Some(free) = &mut self.free {
            free.move_speed = speed;
        }
    }

    /// Degrees per mouse unit per second, free cameras only
    pub fn set_rotation_speed(&mut self, speed: f32) {
        if let Some(free) = &mut self.free {
            free.rotation_speed = speed;
        }
    }

    /// Key press (`pressed`) or release; ignored without a camera
    pub fn keyboard_event(&mut self, key: KeyCode, pressed: bool) {
        if self.camera.is_none() {
            return;
        }
        if let Some(free) = &mut self.free {
            free.keyboard_event(key, pressed);
        }
    }

    /// Relative mouse motion; ignored without a camera
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.camera.is_none() {
            return;
        }
        if let Some(free) = &mut self.free {
            free.mouse_motion(dx, dy);
        }
    }

    fn update_capability(&mut self, ctx: &mut UpdateContext<'_>) -> Result<()> {
        let Some(camera) = &self.camera else {
            return Ok(());
        };

        if let Some(free) = &mut self.free {
            free.apply(ctx.time_step, ctx.transform);
        }

        let view = ctx.world_matrix().inverse();
        camera
            .lock()
            .map_err(|_| Error::LockPoisoned("controlled camera".to_string()))?
            .set_view(view);
        Ok(())
    }
}

impl_capability!(CameraController, CapabilityKind::CameraController);

impl fmt::Display for CameraController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CameraController[mode = {}, camera = {}]",
            if self.is_free() { "free" } else { "fixed" },
            if self.camera.is_some() { "set" } else { "null" }
        )
    }
}

#[cfg(test)]
#[path = "camera_controller_tests.rs"]
mod tests;
