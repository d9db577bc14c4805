/// Null backend - a render system that draws nothing
///
/// Accepts every well-formed call, mirrors the state the renderer asked
/// for and counts the calls in `NullStats`. Only calls a real graphics API
/// would refuse are rejected: a texture unit beyond the configured count,
/// or a draw whose vertex data is not the one bound for drawing.

use std::collections::BTreeMap;
use rustc_hash::FxHashMap;
use sequoia_engine::sequoia::render::{
    DrawCommand, ProgramHandle, RenderBackend, RenderPipeline, TextureHandle, UniformVariable,
    VertexDataHandle,
};
use sequoia_engine::sequoia::{Error, Result};
use sequoia_engine::{engine_err, engine_trace};
use crate::null_stats::NullStats;

const SOURCE: &str = "sequoia::NullBackend";

/// Texture units available unless configured otherwise
pub const DEFAULT_TEXTURE_UNITS: u32 = 16;

macro_rules! null_state_hooks {
    ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
        $(
            fn $hook(&mut self, value: $ty) -> Result<()> {
                engine_trace!(SOURCE, "{} = {:?}", stringify!($variant), value);
                self.pipeline.$field = value;
                self.stats.state_changes += 1;
                Ok(())
            }
        )*
    };
}

#[derive(Debug)]
pub struct NullBackend {
    texture_units: u32,
    pipeline: RenderPipeline,
    vertex_data: Option<VertexDataHandle>,
    bound_for_drawing: bool,
    textures: BTreeMap<u32, TextureHandle>,
    uniforms: FxHashMap<(ProgramHandle, String), UniformVariable>,
    viewport: Option<(i32, i32, i32, i32)>,
    stats: NullStats,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::with_texture_units(DEFAULT_TEXTURE_UNITS)
    }

    /// Backend exposing units `0..texture_units`
    pub fn with_texture_units(texture_units: u32) -> Self {
        Self {
            texture_units,
            pipeline: RenderPipeline::default(),
            vertex_data: None,
            bound_for_drawing: false,
            textures: BTreeMap::new(),
            uniforms: FxHashMap::default(),
            viewport: None,
            stats: NullStats::default(),
        }
    }

    // ===== MIRRORED STATE =====

    pub fn texture_units(&self) -> u32 {
        self.texture_units
    }

    /// Program and states as last applied
    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn vertex_data(&self) -> Option<VertexDataHandle> {
        self.vertex_data
    }

    /// Enabled texture units
    pub fn textures(&self) -> &BTreeMap<u32, TextureHandle> {
        &self.textures
    }

    /// Last value uploaded to uniform `name` of `program`
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<&UniformVariable> {
        self.uniforms.get(&(program, name.to_string()))
    }

    pub fn viewport(&self) -> Option<(i32, i32, i32, i32)> {
        self.viewport
    }

    // ===== STATISTICS =====

    pub fn stats(&self) -> &NullStats {
        &self.stats
    }

    /// Zero every counter, mirrored state is kept
    pub fn reset_stats(&mut self) {
        self.stats = NullStats::default();
    }

    fn reject(&mut self, message: String) -> Error {
        self.stats.rejected += 1;
        engine_err!(SOURCE, "{}", message)
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for NullBackend {
    fn program_changed(&mut self, program: Option<ProgramHandle>) -> Result<()> {
        engine_trace!(SOURCE, "program = {:?}", program);
        self.pipeline.program = program;
        self.stats.program_changes += 1;
        Ok(())
    }

    sequoia_engine::for_each_render_state!(null_state_hooks);

    fn vertex_data_changed(&mut self, vertex_data: VertexDataHandle, bind_for_drawing: bool) -> Result<()> {
        engine_trace!(SOURCE, "vertex data = {:?} (draw: {})", vertex_data, bind_for_drawing);
        self.vertex_data = Some(vertex_data);
        self.bound_for_drawing = bind_for_drawing;
        self.stats.vertex_data_binds += 1;
        Ok(())
    }

    fn texture_changed(&mut self, unit: u32, texture: TextureHandle, enable: bool) -> Result<()> {
        if unit >= self.texture_units {
            let message = format!(
                "texture unit {} out of range (0..{})",
                unit, self.texture_units
            );
            return Err(self.reject(message));
        }

        engine_trace!(SOURCE, "texture unit {} = {:?} ({})", unit, texture, if enable { "on" } else { "off" });
        if enable {
            self.textures.insert(unit, texture);
            self.stats.texture_binds += 1;
        } else {
            self.textures.remove(&unit);
            self.stats.texture_unbinds += 1;
        }
        Ok(())
    }

    fn uniform_variable_changed(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: &UniformVariable,
    ) -> Result<()> {
        self.uniforms.insert((program, name.to_string()), value.clone());
        self.stats.uniform_uploads += 1;
        Ok(())
    }

    fn viewport_changed(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        engine_trace!(SOURCE, "viewport = ({}, {}, {}, {})", x, y, width, height);
        self.viewport = Some((x, y, width, height));
        self.stats.viewport_changes += 1;
        Ok(())
    }

    fn clear_color_buffer(&mut self) -> Result<()> {
        self.stats.clears += 1;
        Ok(())
    }

    fn clear_depth_buffer(&mut self) -> Result<()> {
        self.stats.clears += 1;
        Ok(())
    }

    fn clear_stencil_buffer(&mut self) -> Result<()> {
        self.stats.clears += 1;
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        if self.vertex_data != Some(command.vertex_data()) || !self.bound_for_drawing {
            let message = format!(
                "draw of {:?} while {:?} is bound",
                command.vertex_data(),
                self.vertex_data
            );
            return Err(self.reject(message));
        }
        self.stats.draws += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "null_backend_tests.rs"]
mod tests;
