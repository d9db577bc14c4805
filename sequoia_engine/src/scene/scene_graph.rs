/// Scene graph: the forest of scene nodes and its traversal.
///
/// `apply` visits every node, parents before children, either on the
/// calling thread or fork-join on the rayon thread pool.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use super::scene_node::{lock_node, SceneNode, SharedSceneNode};

/// How `SceneGraph::apply` schedules the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Depth-first on the calling thread, stops at the first error
    #[default]
    Sequential,
    /// Each child subtree is a rayon task, joined by its parent
    Parallel,
}

/// First error of a parallel traversal
#[derive(Default)]
struct ParallelState {
    failed: AtomicBool,
    error: Mutex<Option<Error>>,
}

impl ParallelState {
    fn record(&self, error: Error) {
        if let Ok(mut slot) = self.error.lock() {
            if slot.is_none() {
                *slot = Some(error);
            }
        }
        self.failed.store(true, Ordering::Release);
    }

    fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    fn into_result(self) -> Result<()> {
        match self.error.into_inner() {
            Ok(None) => Ok(()),
            Ok(Some(error)) => Err(error),
            Err(_) => Err(Error::LockPoisoned("traversal error slot".to_string())),
        }
    }
}

/// Visit `node`, then return its children
fn visit_node<F>(node: &SharedSceneNode, visitor: &F) -> Result<Vec<SharedSceneNode>>
where
    F: Fn(&mut SceneNode) -> Result<()>,
{
    let mut guard = lock_node(node)?;
    visitor(&mut *guard)?;
    // The lock is released before the children are visited
    Ok(guard.children().to_vec())
}

fn apply_sequential<F>(node: &SharedSceneNode, visitor: &F) -> Result<()>
where
    F: Fn(&mut SceneNode) -> Result<()>,
{
    for child in visit_node(node, visitor)? {
        apply_sequential(&child, visitor)?;
    }
    Ok(())
}

fn apply_parallel<F>(node: &SharedSceneNode, visitor: &F, state: &ParallelState)
where
    F: Fn(&mut SceneNode) -> Result<()> + Sync,
{
    if state.has_failed() {
        return;
    }
    let children = match visit_node(node, visitor) {
        Ok(children) => children,
        Err(error) => {
            state.record(error);
            return;
        }
    };
    rayon::scope(|scope| {
        for child in &children {
            scope.spawn(move |_| apply_parallel(child, visitor, state));
        }
    });
}

#[derive(Default)]
pub struct SceneGraph {
    roots: Vec<SharedSceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` (and its subtree) as a top-level node
    ///
    /// A node that already has a parent is detached from it first.
    pub fn insert(&mut self, node: SharedSceneNode) -> Result<()> {
        let parent = lock_node(&node)?.parent();
        if let Some(parent) = parent {
            SceneNode::remove_child(&parent, &node)?;
        }
        if !self.roots.iter().any(|root| Arc::ptr_eq(root, &node)) {
            self.roots.push(node);
        }
        Ok(())
    }

    /// Remove `node` and its subtree; false if it is not in the graph
    ///
    /// `node` may be a top-level node or any node below one.
    pub fn remove(&mut self, node: &SharedSceneNode) -> Result<bool> {
        let before = self.roots.len();
        self.roots.retain(|root| !Arc::ptr_eq(root, node));
        if self.roots.len() != before {
            return Ok(true);
        }

        let parent = lock_node(node)?.parent();
        match parent {
            Some(parent) if self.contains(&parent)? => SceneNode::remove_child(&parent, node),
            _ => Ok(false),
        }
    }

    /// True if `node` is reachable from a top-level node
    pub fn contains(&self, node: &SharedSceneNode) -> Result<bool> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.roots.iter().any(|root| Arc::ptr_eq(root, &candidate)) {
                return Ok(true);
            }
            current = lock_node(&candidate)?.parent();
        }
        Ok(false)
    }

    pub fn clear(&mut self) {
        self.roots.clear();
    }

    pub fn roots(&self) -> &[SharedSceneNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes in the graph
    pub fn size(&self) -> Result<usize> {
        let count = AtomicUsize::new(0);
        self.apply(
            |_| {
                count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            },
            ExecutionPolicy::Sequential,
        )?;
        Ok(count.into_inner())
    }

    /// Call `visitor` on every node, parents before children
    ///
    /// Sequential: the first error is returned immediately, no other node
    /// is visited afterwards. Parallel: the first error is kept, no new
    /// subtree is started, subtrees already running finish, and the error
    /// is returned once every task has joined. Children of a failing node
    /// are never visited. Panics propagate in both modes.
    pub fn apply<F>(&self, visitor: F, policy: ExecutionPolicy) -> Result<()>
    where
        F: Fn(&mut SceneNode) -> Result<()> + Sync,
    {
        match policy {
            ExecutionPolicy::Sequential => {
                for root in &self.roots {
                    apply_sequential(root, &visitor)?;
                }
                Ok(())
            }
            ExecutionPolicy::Parallel => {
                let state = ParallelState::default();
                let visitor = &visitor;
                let state_ref = &state;
                rayon::scope(|scope| {
                    for root in &self.roots {
                        scope.spawn(move |_| apply_parallel(root, visitor, state_ref));
                    }
                });
                state.into_result()
            }
        }
    }

    /// Advance every node to the next time step
    pub fn update(&self, time_step: f32, policy: ExecutionPolicy) -> Result<()> {
        self.apply(|node| node.update(time_step), policy)
    }

    /// Graphviz description of the graph
    pub fn to_dot(&self) -> Result<String> {
        let mut dot = String::from("digraph SceneGraph {\n");
        let mut next_id = 0usize;
        for root in &self.roots {
            write_dot(root, None, &mut next_id, &mut dot)?;
        }
        dot.push('}');
        Ok(dot)
    }
}

fn write_dot(
    node: &SharedSceneNode,
    parent_id: Option<usize>,
    next_id: &mut usize,
    dot: &mut String,
) -> Result<()> {
    let id = *next_id;
    *next_id += 1;

    let children = {
        let guard = lock_node(node)?;
        dot.push_str(&format!("  node{} [label=\"{}\"];\n", id, guard.name().replace('"', "\\\"")));
        guard.children().to_vec()
    };
    if let Some(parent_id) = parent_id {
        dot.push_str(&format!("  node{} -> node{};\n", parent_id, id));
    }
    for child in &children {
        write_dot(child, Some(id), next_id, dot)?;
    }
    Ok(())
}

impl fmt::Display for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SceneGraph[")?;
        for root in &self.roots {
            match root.try_lock() {
                Ok(node) => {
                    for line in node.to_string().lines() {
                        writeln!(f, "  {}", line)?;
                    }
                }
                Err(_) => writeln!(f, "  <locked>")?,
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
