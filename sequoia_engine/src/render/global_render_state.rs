/// Global render state: uniforms shared by every draw call of a frame.

use std::fmt;
use rustc_hash::FxHashMap;
use super::resource::ProgramHandle;
use super::uniform_variable::{UniformStruct, UniformVariable};

/// Frame-wide uniforms (lights, time, ...), cleared between frames
///
/// Shared uniforms go to whatever program a pass uses; per-program
/// uniforms only to their program.
#[derive(Debug, Clone, Default)]
pub struct GlobalRenderState {
    shared: FxHashMap<String, UniformVariable>,
    per_program: FxHashMap<ProgramHandle, FxHashMap<String, UniformVariable>>,
}

impl GlobalRenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set uniform `name`, shared by all programs
    pub fn set_shared_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformVariable>) {
        self.shared.insert(name.into(), value.into());
    }

    /// Flatten `value` into shared `name.Member` (or `name[index].Member`) uniforms
    pub fn set_shared_uniform_struct<S: UniformStruct>(&mut self, name: &str, value: &S, index: Option<usize>) {
        value.to_uniform_map(name, index, &mut self.shared);
    }

    /// Set uniform `name` for `program` only
    pub fn set_per_program_uniform(
        &mut self,
        program: ProgramHandle,
        name: impl Into<String>,
        value: impl Into<UniformVariable>,
    ) {
        self.per_program
            .entry(program)
            .or_default()
            .insert(name.into(), value.into());
    }

    pub fn shared_uniforms(&self) -> &FxHashMap<String, UniformVariable> {
        &self.shared
    }

    /// Uniforms exclusive to `program`, `None` if none were registered
    pub fn per_program_uniforms(&self, program: ProgramHandle) -> Option<&FxHashMap<String, UniformVariable>> {
        self.per_program.get(&program)
    }

    pub fn has_per_program_uniforms(&self, program: ProgramHandle) -> bool {
        self.per_program.contains_key(&program)
    }

    /// Clear every registered uniform
    pub fn reset(&mut self) {
        self.shared.clear();
        self.per_program.clear();
    }
}

impl fmt::Display for GlobalRenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GlobalRenderState[")?;
        let mut names: Vec<&String> = self.shared.keys().collect();
        names.sort();
        for name in names {
            writeln!(f, "  shared {} = {},", name, self.shared[name])?;
        }
        for (program, uniforms) in &self.per_program {
            writeln!(f, "  program {:?}: {} uniforms,", program, uniforms.len())?;
        }
        write!(f, "]")
    }
}
