/// Scene: a scene graph plus the camera it is viewed through.
///
/// Every frame the scene is updated, then turned into a `RenderCommand`:
/// one draw command per active drawable and the point lights as shared
/// uniforms.

use std::fmt;
use std::sync::{Arc, Mutex};
use winit::keyboard::KeyCode;
use crate::engine_trace;
use crate::error::{Error, Result};
use crate::render::{DrawCommand, RenderCommand, SharedCamera, UniformVariable};
use super::camera_controller::CameraController;
use super::drawable::Drawable;
use super::point_light::{PointLight, POINT_LIGHT_COUNT_UNIFORM, POINT_LIGHT_UNIFORM};
use super::scene_graph::{ExecutionPolicy, SceneGraph};

pub struct Scene {
    name: String,
    graph: SceneGraph,
    active_camera: Option<SharedCamera>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: SceneGraph::new(),
            active_camera: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn active_camera(&self) -> Option<&SharedCamera> {
        self.active_camera.as_ref()
    }

    pub fn set_active_camera(&mut self, camera: Option<SharedCamera>) {
        self.active_camera = camera;
    }

    /// Advance every node to the next time step
    pub fn update(&self, time_step: f32, policy: ExecutionPolicy) -> Result<()> {
        self.graph.update(time_step, policy)
    }

    /// Fill `command` with this frame's draw commands and lights
    ///
    /// Draw commands use each node's world matrix from the last `update`.
    /// With `ExecutionPolicy::Sequential` they follow traversal order;
    /// parallel collection gives no ordering guarantee.
    pub fn prepare_render_command(&self, command: &mut RenderCommand, policy: ExecutionPolicy) -> Result<()> {
        let draw_commands: Mutex<Vec<Arc<DrawCommand>>> = Mutex::new(Vec::new());
        let lights: Mutex<Vec<(glam::Vec3, PointLight)>> = Mutex::new(Vec::new());

        self.graph.apply(
            |node| {
                let world = node.world_matrix();
                if let Some(drawable) = node.get_mut::<Drawable>() {
                    if drawable.is_active() {
                        let prepared = drawable.prepare_draw_command(world);
                        draw_commands
                            .lock()
                            .map_err(|_| Error::LockPoisoned("draw command list".to_string()))?
                            .push(prepared);
                    }
                }
                if let Some(light) = node.get::<PointLight>() {
                    lights
                        .lock()
                        .map_err(|_| Error::LockPoisoned("light list".to_string()))?
                        .push((world.w_axis.truncate(), light.clone()));
                }
                Ok(())
            },
            policy,
        )?;

        let draw_commands = draw_commands
            .into_inner()
            .map_err(|_| Error::LockPoisoned("draw command list".to_string()))?;
        let lights = lights
            .into_inner()
            .map_err(|_| Error::LockPoisoned("light list".to_string()))?;

        engine_trace!(
            "sequoia::Scene",
            "'{}': {} draw commands, {} point lights",
            self.name,
            draw_commands.len(),
            lights.len()
        );

        for prepared in draw_commands {
            command.push_draw_command(prepared);
        }

        if !lights.is_empty() {
            let global = command.global_state_mut();
            for (index, (position, light)) in lights.iter().enumerate() {
                global.set_shared_uniform_struct(POINT_LIGHT_UNIFORM, &light.to_uniform(*position), Some(index));
            }
            global.set_shared_uniform(POINT_LIGHT_COUNT_UNIFORM, UniformVariable::Int(lights.len() as i32));
        }
        Ok(())
    }

    /// Forward a key press or release to every camera controller
    pub fn keyboard_event(&self, key: KeyCode, pressed: bool) -> Result<()> {
        self.graph.apply(
            |node| {
                if let Some(controller) = node.get_mut::<CameraController>() {
                    controller.keyboard_event(key, pressed);
                }
                Ok(())
            },
            ExecutionPolicy::Sequential,
        )
    }

    /// Forward relative mouse motion to every camera controller
    pub fn mouse_motion_event(&self, dx: f32, dy: f32) -> Result<()> {
        self.graph.apply(
            |node| {
                if let Some(controller) = node.get_mut::<CameraController>() {
                    controller.mouse_motion(dx, dy);
                }
                Ok(())
            },
            ExecutionPolicy::Sequential,
        )
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scene[")?;
        writeln!(f, "  name = {},", self.name)?;
        writeln!(
            f,
            "  active_camera = {},",
            if self.active_camera.is_some() { "set" } else { "null" }
        )?;
        for line in self.graph.to_string().lines() {
            writeln!(f, "  {}", line)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
