//! Unit tests for scene_node.rs

use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::render::Camera;
use crate::scene::{CameraController, CapabilityKind, PointLight, SceneNode};
use super::lock_node;

#[test]
fn test_new_node() {
    let node = SceneNode::new("root");

    assert_eq!(node.name(), "root");
    assert!(!node.has_parent());
    assert!(!node.has_children());
    assert_eq!(node.world_matrix(), Mat4::IDENTITY);
}

#[test]
fn test_add_child_sets_parent() {
    let parent = SceneNode::new("parent").shared();
    let child = SceneNode::new("child").shared();

    SceneNode::add_child(&parent, child.clone()).unwrap();

    assert_eq!(lock_node(&parent).unwrap().children().len(), 1);
    let child_parent = lock_node(&child).unwrap().parent().unwrap();
    assert!(Arc::ptr_eq(&child_parent, &parent));
}

#[test]
fn test_add_child_reparents() {
    let a = SceneNode::new("a").shared();
    let b = SceneNode::new("b").shared();
    let child = SceneNode::new("child").shared();

    SceneNode::add_child(&a, child.clone()).unwrap();
    SceneNode::add_child(&b, child.clone()).unwrap();

    assert!(!lock_node(&a).unwrap().has_children());
    assert_eq!(lock_node(&b).unwrap().children().len(), 1);
}

#[test]
#[should_panic(expected = "child of itself")]
fn test_add_self_as_child_panics() {
    let node = SceneNode::new("n").shared();
    SceneNode::add_child(&node, node.clone()).unwrap();
}

#[test]
#[should_panic(expected = "of its descendants")]
fn test_add_parent_under_child_panics() {
    let a = SceneNode::new("a").shared();
    let b = SceneNode::new("b").shared();
    SceneNode::add_child(&a, b.clone()).unwrap();

    SceneNode::add_child(&b, a).unwrap();
}

#[test]
#[should_panic(expected = "of its descendants")]
fn test_add_ancestor_under_grandchild_panics() {
    let root = SceneNode::new("root").shared();
    let middle = SceneNode::new("middle").shared();
    let leaf = SceneNode::new("leaf").shared();
    SceneNode::add_child(&root, middle.clone()).unwrap();
    SceneNode::add_child(&middle, leaf.clone()).unwrap();

    SceneNode::add_child(&leaf, root).unwrap();
}

#[test]
fn test_add_sibling_subtree_is_allowed() {
    let root = SceneNode::new("root").shared();
    let left = SceneNode::new("left").shared();
    let right = SceneNode::new("right").shared();
    SceneNode::add_child(&root, left.clone()).unwrap();
    SceneNode::add_child(&root, right.clone()).unwrap();

    SceneNode::add_child(&left, right.clone()).unwrap();

    assert_eq!(lock_node(&root).unwrap().children().len(), 1);
    assert!(Arc::ptr_eq(&lock_node(&right).unwrap().parent().unwrap(), &left));
}

#[test]
fn test_remove_child() {
    let parent = SceneNode::new("parent").shared();
    let child = SceneNode::new("child").shared();
    SceneNode::add_child(&parent, child.clone()).unwrap();

    assert!(SceneNode::remove_child(&parent, &child).unwrap());
    assert!(!SceneNode::remove_child(&parent, &child).unwrap());
    assert!(!lock_node(&child).unwrap().has_parent());
}

#[test]
fn test_update_composes_parent_world() {
    let parent = SceneNode::new("parent").shared();
    let child = SceneNode::new("child").shared();
    SceneNode::add_child(&parent, child.clone()).unwrap();
    lock_node(&parent).unwrap().transform_mut().set_position(Vec3::X);
    lock_node(&child).unwrap().transform_mut().set_position(Vec3::Y);

    // Parent first, as every traversal does
    lock_node(&parent).unwrap().update(0.1).unwrap();
    lock_node(&child).unwrap().update(0.1).unwrap();

    let world = lock_node(&child).unwrap().world_matrix();
    assert_eq!(world.w_axis.truncate(), Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_update_drives_camera_controller() {
    let camera = Camera::default().shared();
    let node = SceneNode::new("camera").shared();
    {
        let mut node = lock_node(&node).unwrap();
        node.add_capability(CameraController::fixed(camera.clone()));
        node.transform_mut().set_position(Vec3::new(0.0, 2.0, 0.0));
    }

    lock_node(&node).unwrap().update(0.016).unwrap();

    let eye = camera.lock().unwrap().eye();
    assert!(eye.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
}

#[test]
fn test_capability_accessors() {
    let mut node = SceneNode::new("light");
    node.add_capability(PointLight::default());

    assert!(node.capabilities().has(CapabilityKind::Emittable));
    assert!(node.get::<PointLight>().is_some());
    assert!(node.get::<CameraController>().is_none());

    node.get_mut::<PointLight>().unwrap().set_power(Vec3::splat(3.0));
    assert_eq!(node.get::<PointLight>().unwrap().power(), Vec3::splat(3.0));
}

#[test]
fn test_clone_node_names() {
    let node = SceneNode::new("cube");

    let first = node.clone_node().unwrap();
    assert_eq!(lock_node(&first).unwrap().name(), "cube_copy_1");

    let second = lock_node(&first).unwrap().clone_node().unwrap();
    assert_eq!(lock_node(&second).unwrap().name(), "cube_copy_2");
}

#[test]
fn test_copy_name_saturates_version() {
    assert_eq!(super::copy_name("cube_copy_4294967295"), "cube_copy_4294967295");
    assert_eq!(super::copy_name("cube_copy_x"), "cube_copy_x_copy_1");
}

#[test]
fn test_clone_node_is_deep() {
    let root = SceneNode::new("root").shared();
    let child = SceneNode::new("child").shared();
    SceneNode::add_child(&root, child.clone()).unwrap();
    lock_node(&root).unwrap().add_capability(PointLight::default());

    let copy = lock_node(&root).unwrap().clone_node().unwrap();
    let copy_guard = lock_node(&copy).unwrap();

    assert!(!copy_guard.has_parent());
    assert!(copy_guard.get::<PointLight>().is_some());
    assert_eq!(copy_guard.children().len(), 1);
    let child_copy = copy_guard.children()[0].clone();
    drop(copy_guard);

    assert!(!Arc::ptr_eq(&child_copy, &child));
    let child_copy = lock_node(&child_copy).unwrap();
    assert_eq!(child_copy.name(), "child_copy_1");
    assert!(Arc::ptr_eq(&child_copy.parent().unwrap(), &copy));
}

#[test]
fn test_display() {
    let parent = SceneNode::new("parent").shared();
    let child = SceneNode::new("child").shared();
    SceneNode::add_child(&parent, child.clone()).unwrap();

    let text = lock_node(&child).unwrap().to_string();
    assert!(text.contains("name = child"));
    assert!(text.contains("parent = parent"));
    assert!(text.contains("capabilities = null"));

    let text = lock_node(&parent).unwrap().to_string();
    assert!(text.contains("children = [child]"));
}
