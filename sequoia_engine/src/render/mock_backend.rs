/// Mock render backend for unit tests (no GPU required)
///
/// Records every hook invocation, in order, and can be told to reject
/// hooks by name so failure paths of the renderer can be exercised.

use glam::Mat4;
use rustc_hash::FxHashSet;
use crate::error::{Error, Result};
use crate::render::{
    DrawCommand, ProgramHandle, RenderBackend, TextureHandle, UniformVariable, VertexDataHandle,
};

/// One recorded hook invocation
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Program(Option<ProgramHandle>),
    /// Render state hook: state name and printed value
    State(&'static str, String),
    VertexData(VertexDataHandle, bool),
    Texture(u32, TextureHandle, bool),
    Uniform(ProgramHandle, String, UniformVariable),
    Viewport(i32, i32, i32, i32),
    ClearColor,
    ClearDepth,
    ClearStencil,
    Draw(VertexDataHandle, Mat4),
}

impl MockCall {
    /// Name used by `MockBackend::reject`
    pub fn hook_name(&self) -> &str {
        match self {
            MockCall::Program(_) => "Program",
            MockCall::State(name, _) => *name,
            MockCall::VertexData(..) => "VertexData",
            MockCall::Texture(..) => "Texture",
            MockCall::Uniform(..) => "Uniform",
            MockCall::Viewport(..) => "Viewport",
            MockCall::ClearColor => "ClearColor",
            MockCall::ClearDepth => "ClearDepth",
            MockCall::ClearStencil => "ClearStencil",
            MockCall::Draw(..) => "Draw",
        }
    }
}

#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: Vec<MockCall>,
    rejected_hooks: FxHashSet<String>,
    rejected_uniforms: FxHashSet<String>,
    rejected_draws: FxHashSet<usize>,
    draw_count: usize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every call of hook `name` ("Program", "DepthFunc", "Texture", ...)
    pub fn reject(&mut self, name: &str) {
        self.rejected_hooks.insert(name.to_string());
    }

    /// Accept hook `name` again
    pub fn accept(&mut self, name: &str) {
        self.rejected_hooks.remove(name);
    }

    /// Reject uploads of uniform `name` only
    pub fn reject_uniform(&mut self, name: &str) {
        self.rejected_uniforms.insert(name.to_string());
    }

    /// Reject the `index`-th draw call (0-based, counted over the backend lifetime)
    pub fn reject_draw(&mut self, index: usize) {
        self.rejected_draws.insert(index);
    }

    /// Take and clear the recorded calls
    pub fn take_calls(&mut self) -> Vec<MockCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls of hook `name`
    pub fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| c.hook_name() == name).count()
    }

    /// Recorded uniform uploads of `name`
    pub fn uniform_uploads(&self, name: &str) -> Vec<UniformVariable> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Uniform(_, n, v) if n == name => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: MockCall) -> Result<()> {
        let rejected = self.rejected_hooks.contains(call.hook_name())
            || matches!(&call, MockCall::Uniform(_, name, _) if self.rejected_uniforms.contains(name));
        let name = call.hook_name().to_string();
        self.calls.push(call);
        if rejected {
            Err(Error::BackendError(format!("{} rejected", name)))
        } else {
            Ok(())
        }
    }
}

macro_rules! mock_state_hooks {
    ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
        $(
            fn $hook(&mut self, value: $ty) -> Result<()> {
                self.record(MockCall::State(stringify!($variant), value.to_string()))
            }
        )*
    };
}

impl RenderBackend for MockBackend {
    fn program_changed(&mut self, program: Option<ProgramHandle>) -> Result<()> {
        self.record(MockCall::Program(program))
    }

    crate::for_each_render_state!(mock_state_hooks);

    fn vertex_data_changed(&mut self, vertex_data: VertexDataHandle, bind_for_drawing: bool) -> Result<()> {
        self.record(MockCall::VertexData(vertex_data, bind_for_drawing))
    }

    fn texture_changed(&mut self, unit: u32, texture: TextureHandle, enable: bool) -> Result<()> {
        self.record(MockCall::Texture(unit, texture, enable))
    }

    fn uniform_variable_changed(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: &UniformVariable,
    ) -> Result<()> {
        self.record(MockCall::Uniform(program, name.to_string(), value.clone()))
    }

    fn viewport_changed(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.record(MockCall::Viewport(x, y, width, height))
    }

    fn clear_color_buffer(&mut self) -> Result<()> {
        self.record(MockCall::ClearColor)
    }

    fn clear_depth_buffer(&mut self) -> Result<()> {
        self.record(MockCall::ClearDepth)
    }

    fn clear_stencil_buffer(&mut self) -> Result<()> {
        self.record(MockCall::ClearStencil)
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        let index = self.draw_count;
        self.draw_count += 1;
        self.record(MockCall::Draw(command.vertex_data(), *command.model_matrix()))?;
        if self.rejected_draws.contains(&index) {
            return Err(Error::BackendError(format!("draw #{} rejected", index)));
        }
        Ok(())
    }
}
