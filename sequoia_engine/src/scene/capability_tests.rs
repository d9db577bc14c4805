//! Unit tests for capability.rs

use std::fmt;
use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::scene::{
    Capability, CapabilityKind, CapabilitySet, Transform, UpdateContext,
};

#[derive(Debug, Clone, Default)]
struct Counter {
    updates: u32,
}

impl Counter {
    fn update_capability(&mut self, _ctx: &mut UpdateContext<'_>) -> Result<()> {
        self.updates += 1;
        Ok(())
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Counter[updates = {}]", self.updates)
    }
}

impl_capability!(Counter, CapabilityKind::Emittable);

#[test]
fn test_add_and_get() {
    let mut set = CapabilitySet::new();
    assert!(set.is_empty());

    set.add(Box::new(Counter::default()));

    assert!(set.has(CapabilityKind::Emittable));
    assert!(!set.has(CapabilityKind::Drawable));
    assert_eq!(set.get::<Counter>().unwrap().updates, 0);
}

#[test]
#[should_panic(expected = "already has a Emittable capability")]
fn test_duplicate_kind_panics() {
    let mut set = CapabilitySet::new();
    set.add(Box::new(Counter::default()));
    set.add(Box::new(Counter::default()));
}

#[test]
#[should_panic(expected = "no Emittable capability")]
fn test_require_missing_panics() {
    let set = CapabilitySet::new();
    set.require::<Counter>();
}

#[test]
fn test_update_through_trait_object() {
    let mut set = CapabilitySet::new();
    set.add(Box::new(Counter::default()));
    let mut transform = Transform::new();

    for capability in set.iter_mut() {
        let mut ctx = UpdateContext {
            time_step: 0.1,
            parent_world: Mat4::IDENTITY,
            transform: &mut transform,
        };
        capability.update(&mut ctx).unwrap();
    }

    assert_eq!(set.require::<Counter>().updates, 1);
}

#[test]
fn test_clone_is_deep() {
    let mut set = CapabilitySet::new();
    set.add(Box::new(Counter::default()));

    let copy = set.clone();
    set.get_mut::<Counter>().unwrap().updates = 5;

    assert_eq!(copy.get::<Counter>().unwrap().updates, 0);
}

#[test]
fn test_remove() {
    let mut set = CapabilitySet::new();
    set.add(Box::new(Counter::default()));

    let removed = set.remove(CapabilityKind::Emittable).unwrap();

    assert_eq!(removed.kind(), CapabilityKind::Emittable);
    assert!(set.is_empty());
    assert!(set.remove(CapabilityKind::Emittable).is_none());
}

#[test]
fn test_update_context_world_matrix() {
    let mut transform = Transform::from_position(Vec3::X);
    let mut ctx = UpdateContext {
        time_step: 0.0,
        parent_world: Mat4::from_translation(Vec3::Y),
        transform: &mut transform,
    };

    assert_eq!(ctx.world_matrix().w_axis.truncate(), Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_kind_listing() {
    assert_eq!(CapabilityKind::ALL.len(), CapabilityKind::COUNT);
    assert_eq!(CapabilityKind::CameraController.to_string(), "CameraController");
}
