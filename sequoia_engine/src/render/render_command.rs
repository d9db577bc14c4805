/// Render command: everything needed to render one frame.

use std::sync::Arc;
use super::draw_command::DrawCommand;
use super::global_render_state::GlobalRenderState;
use super::render_target::RenderTarget;
use super::technique::RenderTechnique;

/// Per-frame aggregation of what to render and where
///
/// Created once and `reset()` between frames. Draw commands are the
/// immutable copies published by each drawable's double buffer, so the
/// scene can keep changing while the command is rendered.
#[derive(Default)]
pub struct RenderCommand {
    target: Option<Arc<dyn RenderTarget>>,
    techniques: Vec<Arc<dyn RenderTechnique>>,
    draw_commands: Vec<Arc<DrawCommand>>,
    global_state: GlobalRenderState,
}

impl RenderCommand {
    pub fn new(target: Arc<dyn RenderTarget>) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// Clear the draw commands and the global state, keep target and techniques
    pub fn reset(&mut self) {
        self.draw_commands.clear();
        self.global_state.reset();
    }

    pub fn target(&self) -> Option<&Arc<dyn RenderTarget>> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: Arc<dyn RenderTarget>) {
        self.target = Some(target);
    }

    pub fn techniques(&self) -> &[Arc<dyn RenderTechnique>] {
        &self.techniques
    }

    /// Append a technique; techniques render in insertion order
    pub fn add_technique(&mut self, technique: Arc<dyn RenderTechnique>) {
        self.techniques.push(technique);
    }

    pub fn clear_techniques(&mut self) {
        self.techniques.clear();
    }

    /// Draw commands in the order they will be issued
    pub fn draw_commands(&self) -> &[Arc<DrawCommand>] {
        &self.draw_commands
    }

    pub fn push_draw_command(&mut self, command: Arc<DrawCommand>) {
        self.draw_commands.push(command);
    }

    pub fn global_state(&self) -> &GlobalRenderState {
        &self.global_state
    }

    pub fn global_state_mut(&mut self) -> &mut GlobalRenderState {
        &mut self.global_state
    }
}

#[cfg(test)]
#[path = "render_command_tests.rs"]
mod tests;
