//! Unit tests for drawable.rs

use glam::{Mat4, Vec3};
use crate::render::{DrawMode, ResourceRegistry, TextureDesc, UniformVariable, VertexDataDesc};
use crate::scene::{Capability, CapabilityKind, Drawable};

fn drawable() -> (ResourceRegistry, Drawable) {
    let mut registry = ResourceRegistry::new();
    let data = registry
        .create_vertex_data(VertexDataDesc {
            name: "cube".to_string(),
            draw_mode: DrawMode::Triangles,
            vertex_count: 36,
            index_count: 0,
        })
        .unwrap();
    (registry, Drawable::new(data))
}

#[test]
fn test_new_drawable_is_active() {
    let (_registry, drawable) = drawable();

    assert!(drawable.is_active());
    assert_eq!(drawable.kind(), CapabilityKind::Drawable);
    assert_eq!(*drawable.draw_command().model_matrix(), Mat4::IDENTITY);
}

#[test]
fn test_prepare_writes_model_matrix() {
    let (_registry, mut drawable) = drawable();
    let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));

    let command = drawable.prepare_draw_command(model);

    assert_eq!(*command.model_matrix(), model);
}

#[test]
fn test_published_command_is_isolated_from_later_changes() {
    let (mut registry, mut drawable) = drawable();
    let texture = registry
        .create_texture(TextureDesc { name: "t".to_string(), width: 1, height: 1 })
        .unwrap();
    let frame_n = Mat4::from_translation(Vec3::X);

    let published = drawable.prepare_draw_command(frame_n);

    // Game logic prepares frame N+1 while frame N is being rendered
    drawable.set_texture(0, texture);
    drawable.set_uniform("u_Color", Vec3::ONE);
    let next = drawable.prepare_draw_command(Mat4::from_translation(Vec3::Y));

    assert_eq!(*published.model_matrix(), frame_n);
    assert!(published.textures().is_empty());
    assert!(published.uniforms().is_empty());
    assert_eq!(next.textures().get(&0), Some(&texture));
}

#[test]
fn test_state_carries_over_between_frames() {
    let (_registry, mut drawable) = drawable();
    drawable.set_uniform("u_Scale", 2.0f32);

    drawable.prepare_draw_command(Mat4::IDENTITY);
    let second = drawable.prepare_draw_command(Mat4::IDENTITY);

    assert_eq!(second.uniforms()["u_Scale"], UniformVariable::Float(2.0));
}

#[test]
#[should_panic(expected = "inactive drawable")]
fn test_prepare_inactive_panics() {
    let (_registry, mut drawable) = drawable();
    drawable.set_active(false);
    drawable.prepare_draw_command(Mat4::IDENTITY);
}

#[test]
fn test_clone_box_is_independent() {
    let (_registry, mut drawable) = drawable();
    let copy = drawable.clone_box();

    drawable.set_uniform("u_x", 1i32);

    let copy = copy.as_any().downcast_ref::<Drawable>().unwrap();
    assert!(copy.draw_command().uniforms().is_empty());
}

#[test]
fn test_display() {
    let (_registry, drawable) = drawable();
    assert!(drawable.to_string().starts_with("Drawable[active = true"));
}
