/// Render techniques and passes.
///
/// A technique is an ordered set of passes. The renderer hands each
/// technique a callback; the technique calls it once per pass, in the
/// order it wants them rendered. Each pass customizes a `DrawCallContext`
/// (pipeline, clear flags, extra uniforms) before the renderer applies it.

use std::sync::Arc;
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use super::draw_command::DrawCommand;
use super::global_render_state::GlobalRenderState;
use super::render_pipeline::RenderPipeline;
use super::render_target::RenderTarget;
use super::resource::ProgramHandle;
use super::uniform_variable::UniformVariable;
use super::viewport::Viewport;

bitflags! {
    /// Buffers cleared at the start of a pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearBuffers: u8 {
        /// Color buffer
        const COLOR = 0b001;
        /// Depth buffer
        const DEPTH = 0b010;
        /// Stencil buffer
        const STENCIL = 0b100;
    }
}

/// Per-pass state handed to `RenderPass::set_up`
pub struct DrawCallContext<'a> {
    /// Viewport (including the camera), the target's viewport by default
    pub viewport: Viewport,

    /// Pipeline of the pass (including the program), defaults otherwise
    pub pipeline: RenderPipeline,

    /// Uniforms bound to the pass program after the global ones
    pub uniforms: FxHashMap<String, UniformVariable>,

    /// Buffers to clear, all of them by default
    pub clear: ClearBuffers,

    /// Target of the frame
    pub target: &'a dyn RenderTarget,

    /// Frame-wide uniforms
    pub global_state: &'a GlobalRenderState,

    /// Draw commands issued by the pass, in order
    pub draw_commands: &'a [Arc<DrawCommand>],
}

impl<'a> DrawCallContext<'a> {
    pub fn new(
        viewport: Viewport,
        target: &'a dyn RenderTarget,
        global_state: &'a GlobalRenderState,
        draw_commands: &'a [Arc<DrawCommand>],
    ) -> Self {
        Self {
            viewport,
            pipeline: RenderPipeline::default(),
            uniforms: FxHashMap::default(),
            clear: ClearBuffers::all(),
            target,
            global_state,
            draw_commands,
        }
    }

    /// Set a pass uniform, overriding an existing value
    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformVariable>) {
        self.uniforms.insert(name.into(), value.into());
    }
}

/// One pass of a technique
pub trait RenderPass: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Configure the context before anything is sent to the backend
    fn set_up(&self, ctx: &mut DrawCallContext<'_>);

    /// Called once every draw command of the pass has been issued
    fn tear_down(&self, _ctx: &DrawCallContext<'_>) {}
}

/// Ordered set of passes
pub trait RenderTechnique: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Call `renderer` once for every pass, in rendering order
    fn render(&self, renderer: &mut dyn FnMut(&dyn RenderPass));
}

// ===== FORWARD RENDERING =====

/// Single pass drawing every command with one program
pub struct ForwardPass {
    program: ProgramHandle,
    clear: ClearBuffers,
}

impl ForwardPass {
    pub fn new(program: ProgramHandle) -> Self {
        Self { program, clear: ClearBuffers::all() }
    }

    /// Override the buffers cleared before drawing
    pub fn with_clear(mut self, clear: ClearBuffers) -> Self {
        self.clear = clear;
        self
    }
}

impl RenderPass for ForwardPass {
    fn name(&self) -> &str {
        "ForwardPass"
    }

    fn set_up(&self, ctx: &mut DrawCallContext<'_>) {
        ctx.pipeline.program = Some(self.program);
        ctx.clear = self.clear;
    }
}

/// Plain forward rendering: a single `ForwardPass`
pub struct ForwardTechnique {
    pass: ForwardPass,
}

impl ForwardTechnique {
    pub fn new(program: ProgramHandle) -> Self {
        Self { pass: ForwardPass::new(program) }
    }

    pub fn with_pass(pass: ForwardPass) -> Self {
        Self { pass }
    }
}

impl RenderTechnique for ForwardTechnique {
    fn name(&self) -> &str {
        "ForwardTechnique"
    }

    fn render(&self, renderer: &mut dyn FnMut(&dyn RenderPass)) {
        renderer(&self.pass);
    }
}
