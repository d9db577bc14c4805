/// Scene node capabilities.
///
/// A capability is a behavior attached to a node (drawable geometry, a
/// light, a camera controller). A node holds at most one capability per
/// kind, stored in a slot array indexed by `CapabilityKind`.

use std::any::Any;
use std::fmt;
use glam::Mat4;
use crate::error::Result;
use super::transform::Transform;

/// Closed set of capability kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// The node can be rendered
    Drawable,
    /// The node emits light
    Emittable,
    /// The node drives a camera
    CameraController,
}

impl CapabilityKind {
    pub const COUNT: usize = 3;

    pub const ALL: [CapabilityKind; Self::COUNT] = [
        CapabilityKind::Drawable,
        CapabilityKind::Emittable,
        CapabilityKind::CameraController,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a capability sees when its node advances to the next time step
pub struct UpdateContext<'a> {
    /// Time step in seconds
    pub time_step: f32,
    /// World matrix of the parent node (identity for roots)
    pub parent_world: Mat4,
    /// Transform of the node, mutable so controllers can move it
    pub transform: &'a mut Transform,
}

impl UpdateContext<'_> {
    /// World matrix of the node from its current transform
    pub fn world_matrix(&mut self) -> Mat4 {
        self.parent_world * *self.transform.model_matrix()
    }
}

/// Behavior attached to a scene node
pub trait Capability: fmt::Display + Send + Sync {
    fn kind(&self) -> CapabilityKind;

    /// Advance to the next time step
    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<()>;

    /// Deep copy, used when a node is cloned
    fn clone_box(&self) -> Box<dyn Capability>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Concrete capability with a statically known kind
pub trait CapabilityType: Capability + Sized + 'static {
    const KIND: CapabilityKind;
}

/// One optional capability per kind
#[derive(Default)]
pub struct CapabilitySet {
    slots: [Option<Box<dyn Capability>>; CapabilityKind::COUNT],
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `capability`
    ///
    /// # Panics
    ///
    /// If a capability of the same kind is already attached.
    pub fn add(&mut self, capability: Box<dyn Capability>) {
        let kind = capability.kind();
        let slot = &mut self.slots[kind.index()];
        assert!(slot.is_none(), "node already has a {} capability", kind);
        *slot = Some(capability);
    }

    /// Detach the capability of `kind`
    pub fn remove(&mut self, kind: CapabilityKind) -> Option<Box<dyn Capability>> {
        self.slots[kind.index()].take()
    }

    pub fn has(&self, kind: CapabilityKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get<T: CapabilityType>(&self) -> Option<&T> {
        self.slots[T::KIND.index()]
            .as_deref()
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: CapabilityType>(&mut self) -> Option<&mut T> {
        self.slots[T::KIND.index()]
            .as_deref_mut()
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Capability `T`, which the caller knows is attached
    ///
    /// # Panics
    ///
    /// If no `T` is attached.
    pub fn require<T: CapabilityType>(&self) -> &T {
        match self.get::<T>() {
            Some(capability) => capability,
            None => panic!("node has no {} capability", T::KIND),
        }
    }

    /// Attached capabilities in kind order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Capability> {
        self.slots.iter().filter_map(|c| c.as_deref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Capability>> {
        self.slots.iter_mut().filter_map(|c| c.as_mut())
    }
}

impl Clone for CapabilitySet {
    fn clone(&self) -> Self {
        Self {
            slots: std::array::from_fn(|i| self.slots[i].as_ref().map(|c| c.clone_box())),
        }
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|c| c.kind()))
            .finish()
    }
}

/// Implement the `Capability` plumbing (kind, cloning, downcasting) for a
/// `Clone` type, forwarding `update` to an inherent `update_capability`
macro_rules! impl_capability {
    ($ty:ty, $kind:expr) => {
        impl $crate::scene::Capability for $ty {
            fn kind(&self) -> $crate::scene::CapabilityKind {
                $kind
            }

            fn update(&mut self, ctx: &mut $crate::scene::UpdateContext<'_>) -> $crate::error::Result<()> {
                self.update_capability(ctx)
            }

            fn clone_box(&self) -> Box<dyn $crate::scene::Capability> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        impl $crate::scene::CapabilityType for $ty {
            const KIND: $crate::scene::CapabilityKind = $kind;
        }
    };
}

pub(crate) use impl_capability;

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
