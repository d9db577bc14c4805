/// Drawable: capability of nodes that produce a draw command every frame.

use std::fmt;
use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::render::{
    DrawCommand, RenderPipeline, TextureHandle, UniformStruct, UniformVariable, VertexDataHandle,
};
use crate::utils::DoubleBuffered;
use super::capability::{impl_capability, CapabilityKind, UpdateContext};

/// Renderable geometry attached to a scene node
///
/// The draw command is double-buffered: `prepare_draw_command` publishes
/// an immutable snapshot for the renderer and keeps a private copy for the
/// next frame, so later changes never leak into a frame being rendered.
#[derive(Debug, Clone)]
pub struct Drawable {
    active: bool,
    command: DoubleBuffered<DrawCommand>,
}

impl Drawable {
    pub fn new(vertex_data: VertexDataHandle) -> Self {
        Self {
            active: true,
            command: DoubleBuffered::new(DrawCommand::new(vertex_data, Mat4::IDENTITY)),
        }
    }

    /// Inactive drawables are skipped when collecting draw commands
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Draw command being prepared for the next frame
    pub fn draw_command(&self) -> &DrawCommand {
        self.command.read()
    }

    pub fn set_vertex_data(&mut self, vertex_data: VertexDataHandle) {
        self.command.write().set_vertex_data(vertex_data);
    }

    pub fn set_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.command.write().set_texture(unit, texture);
    }

    pub fn remove_texture(&mut self, unit: u32) -> Option<TextureHandle> {
        self.command.write().remove_texture(unit)
    }

    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformVariable>) {
        self.command.write().set_uniform(name, value);
    }

    pub fn set_uniform_struct<S: UniformStruct>(&mut self, name: &str, value: &S, index: Option<usize>) {
        self.command.write().set_uniform_struct(name, value, index);
    }

    /// Override the pass pipeline for this drawable
    pub fn set_pipeline(&mut self, pipeline: Option<RenderPipeline>) {
        self.command.write().set_pipeline(pipeline);
    }

    /// Write `model_matrix` into the command and publish it for rendering
    ///
    /// # Panics
    ///
    /// If the drawable is inactive.
    pub fn prepare_draw_command(&mut self, model_matrix: Mat4) -> Arc<DrawCommand> {
        assert!(self.active, "draw command requested from an inactive drawable");
        self.command.write().set_model_matrix(model_matrix);
        self.command.advance()
    }

    fn update_capability(&mut self, _ctx: &mut UpdateContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl_capability!(Drawable, CapabilityKind::Drawable);

impl fmt::Display for Drawable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Drawable[active = {}, command = {}]", self.active, self.command.read())
    }
}

#[cfg(test)]
#[path = "drawable_tests.rs"]
mod tests;
