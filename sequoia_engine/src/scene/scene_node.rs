/// Scene node: a transform in the scene tree with attached capabilities.
///
/// Nodes are shared as `Arc<Mutex<SceneNode>>`. A parent owns its children;
/// children keep a weak reference back to their parent.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use glam::Mat4;
use crate::error::{Error, Result};
use super::capability::{Capability, CapabilitySet, CapabilityType, UpdateContext};
use super::transform::Transform;

pub type SharedSceneNode = Arc<Mutex<SceneNode>>;

const COPY_SUFFIX: &str = "_copy_";

pub struct SceneNode {
    name: String,
    transform: Transform,
    world_matrix: Mat4,
    parent: Weak<Mutex<SceneNode>>,
    children: Vec<SharedSceneNode>,
    capabilities: CapabilitySet,
}

/// Lock `node`, mapping poisoning to `Error::LockPoisoned`
pub fn lock_node(node: &SharedSceneNode) -> Result<MutexGuard<'_, SceneNode>> {
    node.lock()
        .map_err(|_| Error::LockPoisoned("scene node".to_string()))
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            world_matrix: Mat4::IDENTITY,
            parent: Weak::new(),
            children: Vec::new(),
            capabilities: CapabilitySet::new(),
        }
    }

    /// Wrap into a shareable handle
    pub fn shared(self) -> SharedSceneNode {
        Arc::new(Mutex::new(self))
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Model matrix relative to the parent
    pub fn model_matrix(&mut self) -> Mat4 {
        *self.transform.model_matrix()
    }

    /// World matrix computed by the last `update`
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    pub fn parent(&self) -> Option<SharedSceneNode> {
        self.parent.upgrade()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.strong_count() > 0
    }

    pub fn children(&self) -> &[SharedSceneNode] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    // ===== CAPABILITIES =====

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut CapabilitySet {
        &mut self.capabilities
    }

    /// Attach `capability`
    ///
    /// # Panics
    ///
    /// If a capability of the same kind is already attached.
    pub fn add_capability<T: CapabilityType>(&mut self, capability: T) {
        self.capabilities.add(Box::new(capability));
    }

    pub fn get<T: CapabilityType>(&self) -> Option<&T> {
        self.capabilities.get::<T>()
    }

    pub fn get_mut<T: CapabilityType>(&mut self) -> Option<&mut T> {
        self.capabilities.get_mut::<T>()
    }

    // ===== UPDATE =====

    /// Advance to the next time step
    ///
    /// Recomputes the world matrix from the parent's (which must already be
    /// up to date) and updates every capability. Controllers may move the
    /// node; the world matrix then reflects the moved transform.
    pub fn update(&mut self, time_step: f32) -> Result<()> {
        let parent_world = match self.parent() {
            Some(parent) => {
                let parent = lock_node(&parent)?;
                parent.world_matrix
            }
            None => Mat4::IDENTITY,
        };

        for capability in self.capabilities.iter_mut() {
            let mut ctx = UpdateContext {
                time_step,
                parent_world,
                transform: &mut self.transform,
            };
            capability.update(&mut ctx)?;
        }

        self.world_matrix = parent_world * *self.transform.model_matrix();
        Ok(())
    }

    // ===== HIERARCHY =====

    /// Attach `child` to `parent`, detaching it from its previous parent
    ///
    /// # Panics
    ///
    /// If `child` is `parent` or one of its ancestors.
    pub fn add_child(parent: &SharedSceneNode, child: SharedSceneNode) -> Result<()> {
        let mut ancestor = Some(parent.clone());
        while let Some(node) = ancestor {
            assert!(
                !Arc::ptr_eq(&node, &child),
                "a scene node cannot be a child of itself or of its descendants"
            );
            ancestor = lock_node(&node)?.parent();
        }

        let previous = lock_node(&child)?.parent();
        if let Some(previous) = previous {
            Self::remove_child(&previous, &child)?;
        }

        lock_node(&child)?.parent = Arc::downgrade(parent);
        lock_node(parent)?.children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`; false if it was not a child
    pub fn remove_child(parent: &SharedSceneNode, child: &SharedSceneNode) -> Result<bool> {
        let removed = {
            let mut parent = lock_node(parent)?;
            let before = parent.children.len();
            parent.children.retain(|c| !Arc::ptr_eq(c, child));
            parent.children.len() != before
        };
        if removed {
            lock_node(child)?.parent = Weak::new();
        }
        Ok(removed)
    }

    /// Deep copy of this node, its capabilities and its subtree
    ///
    /// The copy is detached. Names get a `_copy_N` suffix, `N` increasing
    /// when a copy is copied again.
    pub fn clone_node(&self) -> Result<SharedSceneNode> {
        let copy = SceneNode {
            name: copy_name(&self.name),
            transform: self.transform.clone(),
            world_matrix: self.world_matrix,
            parent: Weak::new(),
            children: Vec::new(),
            capabilities: self.capabilities.clone(),
        }
        .shared();

        for child in &self.children {
            let child_copy = lock_node(child)?.clone_node()?;
            lock_node(&child_copy)?.parent = Arc::downgrade(&copy);
            lock_node(&copy)?.children.push(child_copy);
        }
        Ok(copy)
    }
}

fn copy_name(name: &str) -> String {
    if let Some(pos) = name.rfind(COPY_SUFFIX) {
        let (base, version) = name.split_at(pos);
        if let Ok(version) = version[COPY_SUFFIX.len()..].parse::<u32>() {
            return format!("{}{}{}", base, COPY_SUFFIX, version.saturating_add(1));
        }
    }
    format!("{}{}1", name, COPY_SUFFIX)
}

impl fmt::Display for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SceneNode[")?;
        writeln!(f, "  name = {},", self.name)?;
        writeln!(f, "  {},", self.transform)?;
        match self.parent() {
            Some(parent) => match parent.try_lock() {
                Ok(parent) => writeln!(f, "  parent = {},", parent.name)?,
                Err(_) => writeln!(f, "  parent = <locked>,")?,
            },
            None => writeln!(f, "  parent = null,")?,
        }
        if self.capabilities.is_empty() {
            writeln!(f, "  capabilities = null,")?;
        } else {
            writeln!(f, "  capabilities = [")?;
            for capability in self.capabilities.iter() {
                writeln!(f, "    {},", capability)?;
            }
            writeln!(f, "  ],")?;
        }
        if self.children.is_empty() {
            writeln!(f, "  children = null")?;
        } else {
            let names: Vec<String> = self
                .children
                .iter()
                .map(|c| match c.try_lock() {
                    Ok(child) => child.name.clone(),
                    Err(_) => "<locked>".to_string(),
                })
                .collect();
            writeln!(f, "  children = [{}]", names.join(", "))?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("capabilities", &self.capabilities)
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "scene_node_tests.rs"]
mod tests;
