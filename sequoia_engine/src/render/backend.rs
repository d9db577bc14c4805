/// Render backend: the hooks a render system must implement.
///
/// The renderer never talks to a graphics API directly. It diffs the
/// desired state against its cache and calls these hooks only for what
/// actually changed. A hook returning `Err` means the backend rejected the
/// change; the renderer reports it and abandons the current operation
/// (pass or draw command) without retrying.
///
/// One `<state>_changed` hook exists per row of `for_each_render_state!`.
/// Implementations outside this crate generate them the same way:
///
/// ```ignore
/// macro_rules! my_state_hooks {
///     ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
///         $( fn $hook(&mut self, value: $ty) -> Result<()> { /* ... */ Ok(()) } )*
///     };
/// }
///
/// impl RenderBackend for MyBackend {
///     sequoia_engine::for_each_render_state!(my_state_hooks);
///     // remaining hooks ...
/// }
/// ```

use crate::error::Result;
use super::draw_command::DrawCommand;
use super::resource::{ProgramHandle, TextureHandle, VertexDataHandle};
use super::uniform_variable::UniformVariable;

macro_rules! declare_state_hooks {
    ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
        $(
            $(#[$doc])*
            fn $hook(&mut self, value: $ty) -> Result<()>;
        )*
    };
}

/// Abstract render system driven by the `Renderer`
pub trait RenderBackend {
    /// The GPU program changed. Always called before any other pipeline hook.
    fn program_changed(&mut self, program: Option<ProgramHandle>) -> Result<()>;

    crate::for_each_render_state!(declare_state_hooks);

    /// Bind `vertex_data` (and make it current for drawing if `bind_for_drawing`)
    fn vertex_data_changed(&mut self, vertex_data: VertexDataHandle, bind_for_drawing: bool) -> Result<()>;

    /// Bind `texture` to `unit` if `enable`, otherwise disable `unit`
    /// (`texture` is then the texture previously bound there)
    fn texture_changed(&mut self, unit: u32, texture: TextureHandle, enable: bool) -> Result<()>;

    /// Upload uniform `name` of `program`
    fn uniform_variable_changed(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: &UniformVariable,
    ) -> Result<()>;

    /// Set the complete viewport rectangle
    fn viewport_changed(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()>;

    fn clear_color_buffer(&mut self) -> Result<()>;

    fn clear_depth_buffer(&mut self) -> Result<()>;

    fn clear_stencil_buffer(&mut self) -> Result<()>;

    /// Issue the draw call; every state it depends on has been applied
    fn draw(&mut self, command: &DrawCommand) -> Result<()>;
}
