use glam::{Mat4, Vec3};
use super::*;

const FOV: f32 = std::f32::consts::FRAC_PI_4;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_perspective() {
    let camera = Camera::perspective(FOV, 16.0 / 9.0, 0.1, 100.0);

    assert_eq!(*camera.view_matrix(), Mat4::IDENTITY);
    assert_eq!(camera.fov_y(), FOV);
    assert_eq!(camera.aspect(), 16.0 / 9.0);
    assert_eq!(camera.z_near(), 0.1);
    assert_eq!(camera.z_far(), 100.0);
}

// ============================================================================
// view_projection_matrix
// ============================================================================

#[test]
fn test_view_projection_matrix() {
    let mut camera = Camera::perspective(FOV, 16.0 / 9.0, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    camera.set_view(view);

    let proj = Mat4::perspective_rh_gl(FOV, 16.0 / 9.0, 0.1, 100.0);
    assert_eq!(camera.view_projection_matrix(), proj * view);
}

#[test]
fn test_aspect_changes_projection() {
    let mut camera = Camera::perspective(FOV, 1.0, 0.1, 100.0);
    let before = camera.projection_matrix();
    camera.set_aspect(2.0);
    assert_ne!(camera.projection_matrix(), before);
}

// ============================================================================
// Setters
// ============================================================================

#[test]
fn test_look_at_and_eye() {
    let mut camera = Camera::default();
    camera.look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);

    assert!(camera.eye().abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
}

#[test]
fn test_set_clip_planes() {
    let mut camera = Camera::default();
    camera.set_clip_planes(1.0, 50.0);
    assert_eq!(camera.z_near(), 1.0);
    assert_eq!(camera.z_far(), 50.0);
}

#[test]
fn test_shared_camera() {
    let shared = Camera::default().shared();
    shared.lock().unwrap().set_aspect(3.0);
    assert_eq!(shared.lock().unwrap().aspect(), 3.0);
}
