//! Scene management module
//!
//! Provides the scene graph, its nodes and their capabilities (drawables,
//! point lights, camera controllers).

mod transform;
mod capability;
mod scene_node;
mod drawable;
mod point_light;
mod camera_controller;
mod scene_graph;
mod scene;

pub use transform::Transform;
pub use capability::{Capability, CapabilityKind, CapabilitySet, CapabilityType, UpdateContext};
pub use scene_node::{lock_node, SceneNode, SharedSceneNode};
pub use drawable::Drawable;
pub use point_light::{PointLight, PointLightUniform, POINT_LIGHT_COUNT_UNIFORM, POINT_LIGHT_UNIFORM};
pub use camera_controller::{CameraController, Keymap};
pub use scene_graph::{ExecutionPolicy, SceneGraph};
pub use scene::Scene;
