/// Draw commands: everything the renderer needs to issue one draw call.

use std::collections::BTreeMap;
use std::fmt;
use glam::Mat4;
use rustc_hash::FxHashMap;
use super::render_pipeline::RenderPipeline;
use super::resource::{TextureHandle, VertexDataHandle};
use super::uniform_variable::{UniformStruct, UniformVariable};

/// Per-drawable record consumed by the renderer
///
/// Texture units are kept ordered so backend calls come out in a
/// deterministic unit order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    vertex_data: VertexDataHandle,
    model_matrix: Mat4,
    textures: BTreeMap<u32, TextureHandle>,
    uniforms: FxHashMap<String, UniformVariable>,
    pipeline: Option<RenderPipeline>,
}

impl DrawCommand {
    /// Create a command drawing `vertex_data` with `model_matrix`
    pub fn new(vertex_data: VertexDataHandle, model_matrix: Mat4) -> Self {
        Self {
            vertex_data,
            model_matrix,
            textures: BTreeMap::new(),
            uniforms: FxHashMap::default(),
            pipeline: None,
        }
    }

    // ===== VERTEX DATA / MODEL =====

    pub fn vertex_data(&self) -> VertexDataHandle {
        self.vertex_data
    }

    pub fn set_vertex_data(&mut self, vertex_data: VertexDataHandle) {
        self.vertex_data = vertex_data;
    }

    /// Matrix placing the vertex data in world space
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    pub fn set_model_matrix(&mut self, model_matrix: Mat4) {
        self.model_matrix = model_matrix;
    }

    // ===== TEXTURES =====

    /// Bind `texture` to `unit`, replacing any texture already bound there
    pub fn set_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.textures.insert(unit, texture);
    }

    /// Unbind `unit`, returning the texture that was bound
    pub fn remove_texture(&mut self, unit: u32) -> Option<TextureHandle> {
        self.textures.remove(&unit)
    }

    pub fn textures(&self) -> &BTreeMap<u32, TextureHandle> {
        &self.textures
    }

    // ===== UNIFORMS =====

    /// Set uniform `name`, overriding an existing value
    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformVariable>) {
        self.uniforms.insert(name.into(), value.into());
    }

    /// Flatten `value` into `name.Member` (or `name[index].Member`) uniforms
    pub fn set_uniform_struct<S: UniformStruct>(&mut self, name: &str, value: &S, index: Option<usize>) {
        value.to_uniform_map(name, index, &mut self.uniforms);
    }

    /// Uniforms specific to this command (mostly material properties)
    pub fn uniforms(&self) -> &FxHashMap<String, UniformVariable> {
        &self.uniforms
    }

    // ===== PIPELINE OVERRIDE =====

    /// Pipeline replacing the pass pipeline for this command only
    pub fn pipeline(&self) -> Option<&RenderPipeline> {
        self.pipeline.as_ref()
    }

    pub fn set_pipeline(&mut self, pipeline: Option<RenderPipeline>) {
        self.pipeline = pipeline;
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DrawCommand[")?;
        writeln!(f, "  vertex_data = {:?},", self.vertex_data)?;
        writeln!(f, "  model_matrix = {},", self.model_matrix)?;
        if self.textures.is_empty() {
            writeln!(f, "  textures = null,")?;
        } else {
            for (unit, texture) in &self.textures {
                writeln!(f, "  texture[{}] = {:?},", unit, texture)?;
            }
        }
        let mut names: Vec<&String> = self.uniforms.keys().collect();
        names.sort();
        for name in names {
            writeln!(f, "  {} = {},", name, self.uniforms[name])?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "draw_command_tests.rs"]
mod tests;
