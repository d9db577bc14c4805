//! Unit tests for scene.rs

use glam::{Mat4, Vec3, Vec4};
use winit::keyboard::KeyCode;
use crate::render::{
    Camera, DrawMode, RenderCommand, ResourceRegistry, UniformVariable, VertexDataDesc,
    VertexDataHandle,
};
use crate::scene::{
    lock_node, CameraController, Drawable, ExecutionPolicy, PointLight, Scene, SceneNode,
    SharedSceneNode,
};

fn vertex_data(registry: &mut ResourceRegistry, name: &str) -> VertexDataHandle {
    registry
        .create_vertex_data(VertexDataDesc {
            name: name.to_string(),
            draw_mode: DrawMode::Triangles,
            vertex_count: 3,
            index_count: 0,
        })
        .unwrap()
}

fn drawable_node(name: &str, data: VertexDataHandle, position: Vec3) -> SharedSceneNode {
    let mut node = SceneNode::new(name);
    node.transform_mut().set_position(position);
    node.add_capability(Drawable::new(data));
    node.shared()
}

#[test]
fn test_prepare_collects_drawables_in_order() {
    let mut registry = ResourceRegistry::new();
    let data = vertex_data(&mut registry, "tri");
    let mut scene = Scene::new("test");
    let root = drawable_node("root", data, Vec3::X);
    SceneNode::add_child(&root, drawable_node("child", data, Vec3::Y)).unwrap();
    scene.graph_mut().insert(root).unwrap();
    scene.graph_mut().insert(drawable_node("other", data, Vec3::Z)).unwrap();

    scene.update(0.016, ExecutionPolicy::Sequential).unwrap();
    let mut command = RenderCommand::default();
    scene.prepare_render_command(&mut command, ExecutionPolicy::Sequential).unwrap();

    let positions: Vec<Vec3> = command
        .draw_commands()
        .iter()
        .map(|c| c.model_matrix().w_axis.truncate())
        .collect();
    assert_eq!(positions, vec![Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Z]);
}

#[test]
fn test_parallel_prepare_collects_everything() {
    let mut registry = ResourceRegistry::new();
    let data = vertex_data(&mut registry, "tri");
    let mut scene = Scene::new("test");
    for i in 0..16 {
        let node = drawable_node(&format!("n{}", i), data, Vec3::splat(i as f32));
        scene.graph_mut().insert(node).unwrap();
    }

    scene.update(0.016, ExecutionPolicy::Parallel).unwrap();
    let mut command = RenderCommand::default();
    scene.prepare_render_command(&mut command, ExecutionPolicy::Parallel).unwrap();

    assert_eq!(command.draw_commands().len(), 16);
}

#[test]
fn test_inactive_drawables_are_skipped() {
    let mut registry = ResourceRegistry::new();
    let data = vertex_data(&mut registry, "tri");
    let mut scene = Scene::new("test");
    let hidden = drawable_node("hidden", data, Vec3::ZERO);
    lock_node(&hidden).unwrap().get_mut::<Drawable>().unwrap().set_active(false);
    scene.graph_mut().insert(hidden).unwrap();
    scene.graph_mut().insert(drawable_node("visible", data, Vec3::ZERO)).unwrap();

    let mut command = RenderCommand::default();
    scene.prepare_render_command(&mut command, ExecutionPolicy::Sequential).unwrap();

    assert_eq!(command.draw_commands().len(), 1);
}

#[test]
fn test_prepared_commands_survive_node_changes() {
    let mut registry = ResourceRegistry::new();
    let data = vertex_data(&mut registry, "tri");
    let mut scene = Scene::new("test");
    let node = drawable_node("n", data, Vec3::X);
    scene.graph_mut().insert(node.clone()).unwrap();

    scene.update(0.016, ExecutionPolicy::Sequential).unwrap();
    let mut command = RenderCommand::default();
    scene.prepare_render_command(&mut command, ExecutionPolicy::Sequential).unwrap();

    // Next frame's logic runs before this frame is rendered
    lock_node(&node).unwrap().transform_mut().set_position(Vec3::Y);
    scene.update(0.016, ExecutionPolicy::Sequential).unwrap();
    lock_node(&node)
        .unwrap()
        .get_mut::<Drawable>()
        .unwrap()
        .set_uniform("u_Changed", 1i32);

    let published = &command.draw_commands()[0];
    assert_eq!(*published.model_matrix(), Mat4::from_translation(Vec3::X));
    assert!(published.uniforms().is_empty());
}

#[test]
fn test_point_lights_become_shared_uniforms() {
    let mut scene = Scene::new("lights");
    for (i, x) in [1.0f32, 2.0].iter().enumerate() {
        let mut node = SceneNode::new(format!("light{}", i));
        node.transform_mut().set_position(Vec3::new(*x, 0.0, 0.0));
        node.add_capability(PointLight::new(Vec3::splat(10.0), Vec4::ONE));
        scene.graph_mut().insert(node.shared()).unwrap();
    }

    scene.update(0.016, ExecutionPolicy::Sequential).unwrap();
    let mut command = RenderCommand::default();
    scene.prepare_render_command(&mut command, ExecutionPolicy::Sequential).unwrap();

    let shared = command.global_state().shared_uniforms();
    assert_eq!(shared["u_NumPointLights"], UniformVariable::Int(2));
    assert_eq!(shared["u_PointLights[0].Position"], UniformVariable::Vec3(Vec3::X));
    assert_eq!(shared["u_PointLights[1].Position"], UniformVariable::Vec3(Vec3::new(2.0, 0.0, 0.0)));
    assert_eq!(shared["u_PointLights[1].Power"], UniformVariable::Vec3(Vec3::splat(10.0)));
}

#[test]
fn test_no_lights_no_light_uniforms() {
    let scene = Scene::new("empty");
    let mut command = RenderCommand::default();

    scene.prepare_render_command(&mut command, ExecutionPolicy::Sequential).unwrap();

    assert!(command.global_state().shared_uniforms().is_empty());
    assert!(command.draw_commands().is_empty());
}

#[test]
fn test_input_reaches_camera_controllers() {
    let camera = Camera::default().shared();
    let mut scene = Scene::new("input");
    let mut node = SceneNode::new("camera");
    node.add_capability(CameraController::free(camera.clone()));
    let node = node.shared();
    scene.graph_mut().insert(node.clone()).unwrap();
    scene.set_active_camera(Some(camera));

    scene.keyboard_event(KeyCode::KeyW, true).unwrap();
    scene.update(1.0, ExecutionPolicy::Sequential).unwrap();

    let position = lock_node(&node).unwrap().transform().position();
    assert!(position.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));

    scene.mouse_motion_event(45.0, 0.0).unwrap();
    scene.update(1.0, ExecutionPolicy::Sequential).unwrap();
    let orientation = lock_node(&node).unwrap().transform().orientation();
    assert_ne!(orientation, glam::Quat::IDENTITY);
}

#[test]
fn test_display() {
    let mut scene = Scene::new("demo");
    scene.graph_mut().insert(SceneNode::new("root").shared()).unwrap();

    let text = scene.to_string();
    assert!(text.contains("name = demo"));
    assert!(text.contains("active_camera = null"));
    assert!(text.contains("name = root"));
}
