/// Sequoia Engine - top-level frame driver
///
/// An `Engine` is an explicit context owned by the application: it holds the
/// configuration, the scene and the render command reused from frame to
/// frame. Renderers stay outside so one engine can drive any backend.

use std::sync::Arc;
use winit::keyboard::KeyCode;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::render::{FrameReport, RenderBackend, RenderCommand, RenderTarget, RenderTechnique, Renderer};
use crate::scene::Scene;

/// Main engine context
///
/// # Example
///
/// ```ignore
/// let mut engine = Engine::new(EngineConfig::default());
/// engine.set_target(Arc::new(DefaultRenderTarget::new("window", 800, 600)));
/// engine.add_technique(Arc::new(ForwardTechnique::new(program)));
///
/// let report = engine.frame(&mut renderer)?;
/// ```
pub struct Engine {
    config: EngineConfig,
    scene: Scene,
    render_command: RenderCommand,
    frame_count: u64,
}

impl Engine {
    /// Create an engine with an empty scene, no target and no technique
    pub fn new(config: EngineConfig) -> Self {
        crate::engine_info!(
            "sequoia::Engine",
            "'{}' created (update = {:?}, collect = {:?}, time step = {}s)",
            config.name,
            config.update_policy,
            config.collect_policy,
            config.time_step
        );
        let scene = Scene::new(config.name.clone());
        Self {
            config,
            scene,
            render_command: RenderCommand::default(),
            frame_count: 0,
        }
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Replace the scene, returning the previous one
    pub fn set_scene(&mut self, scene: Scene) -> Scene {
        std::mem::replace(&mut self.scene, scene)
    }

    /// The render command of the last frame
    pub fn render_command(&self) -> &RenderCommand {
        &self.render_command
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn set_target(&mut self, target: Arc<dyn RenderTarget>) {
        self.render_command.set_target(target);
    }

    /// Append a technique; techniques render in insertion order
    pub fn add_technique(&mut self, technique: Arc<dyn RenderTechnique>) {
        self.render_command.add_technique(technique);
    }

    pub fn clear_techniques(&mut self) {
        self.render_command.clear_techniques();
    }

    // ===== FRAME =====

    /// Run one frame: update, collect, render
    ///
    /// The scene is advanced by the configured time step, the render
    /// command is reset and refilled from the scene, then rendered.
    /// Rejected backend calls do not fail the frame; they are listed in
    /// the returned report.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while updating or collecting the
    /// scene. Nothing is rendered in that case.
    pub fn frame<B: RenderBackend>(&mut self, renderer: &mut Renderer<B>) -> Result<FrameReport> {
        self.scene.update(self.config.time_step, self.config.update_policy)?;

        self.render_command.reset();
        self.scene
            .prepare_render_command(&mut self.render_command, self.config.collect_policy)?;

        let report = renderer.render(&self.render_command);
        self.frame_count += 1;

        if !report.is_clean() {
            crate::engine_warn!(
                "sequoia::Engine",
                "frame {}: {} rejected operations",
                self.frame_count,
                report.failures().len()
            );
        }
        Ok(report)
    }

    // ===== INPUT =====

    /// Forward a key press or release to every camera controller
    pub fn keyboard_event(&self, key: KeyCode, pressed: bool) -> Result<()> {
        self.scene.keyboard_event(key, pressed)
    }

    /// Forward relative mouse motion to every camera controller
    pub fn mouse_motion_event(&self, dx: f32, dy: f32) -> Result<()> {
        self.scene.mouse_motion_event(dx, dy)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
