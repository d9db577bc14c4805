/// Renderer: the state-diffing engine between draw commands and a backend.
///
/// The renderer owns a private cache of everything it last sent to its
/// backend (pipeline, vertex data, texture units, uniforms per program,
/// viewport). Every `set_*` operation compares the request against that
/// cache and calls a backend hook only for what differs, so redundant
/// state changes never reach the graphics API.
///
/// The cache is the single source of truth for diffing: it is only
/// advanced for changes the backend accepted.

use std::collections::BTreeMap;
use std::fmt;
use glam::Mat4;
use rustc_hash::FxHashMap;
use crate::config::RenderOptions;
use crate::error::{Error, Result};
use crate::{engine_debug, engine_warn};
use super::backend::RenderBackend;
use super::draw_command::DrawCommand;
use super::render_command::RenderCommand;
use super::render_pipeline::RenderPipeline;
use super::render_target::RenderTarget;
use super::resource::{ProgramHandle, TextureHandle, VertexDataHandle};
use super::technique::{ClearBuffers, DrawCallContext, RenderPass, RenderTechnique};
use super::uniform_variable::UniformVariable;
use super::viewport::Viewport;

/// Name of the model-view-projection uniform set for every draw command
pub const MVP_UNIFORM: &str = "u_matMVP";

const LOG_SOURCE: &str = "sequoia::Renderer";

// ===== FRAME REPORT =====

/// Step of the render algorithm that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderOperation {
    MissingTarget,
    MissingViewport,
    MissingCamera,
    ClearColorBuffer,
    ClearDepthBuffer,
    ClearStencilBuffer,
    SetRenderPipeline,
    SetViewport,
    SetUniform,
    SetTextures,
    SetVertexData,
    Draw,
}

impl fmt::Display for RenderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderOperation::MissingTarget => "target",
            RenderOperation::MissingViewport => "viewport",
            RenderOperation::MissingCamera => "camera",
            RenderOperation::ClearColorBuffer => "clear_color_buffer",
            RenderOperation::ClearDepthBuffer => "clear_depth_buffer",
            RenderOperation::ClearStencilBuffer => "clear_stencil_buffer",
            RenderOperation::SetRenderPipeline => "set_render_pipeline",
            RenderOperation::SetViewport => "set_viewport",
            RenderOperation::SetUniform => "set_uniform_variable",
            RenderOperation::SetTextures => "set_textures",
            RenderOperation::SetVertexData => "set_vertex_data",
            RenderOperation::Draw => "draw",
        };
        f.write_str(name)
    }
}

/// A rejected operation of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    /// Technique being rendered
    pub technique: String,
    /// Pass being rendered
    pub pass: String,
    /// Failed step
    pub operation: RenderOperation,
    /// Index of the draw command in the pass, `None` for pass-level failures
    pub draw_command: Option<usize>,
    /// Backend message
    pub message: String,
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: failed to call '{}'", self.technique, self.pass, self.operation)?;
        if let Some(index) = self.draw_command {
            write!(f, " for draw command #{}", index)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Failures collected while rendering one frame
///
/// A fresh report is returned by every `Renderer::render` call; nothing
/// accumulates across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    failures: Vec<RenderFailure>,
}

impl FrameReport {
    /// True if every operation of the frame succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[RenderFailure] {
        &self.failures
    }

    /// Failures of a given step
    pub fn failures_of(&self, operation: RenderOperation) -> impl Iterator<Item = &RenderFailure> {
        self.failures.iter().filter(move |f| f.operation == operation)
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "FrameReport[clean]");
        }
        writeln!(f, "FrameReport[{} failures", self.failures.len())?;
        for failure in &self.failures {
            writeln!(f, "  {}", failure)?;
        }
        write!(f, "]")
    }
}

/// Failure sink of the pass being rendered
struct PassScope<'r> {
    technique: &'r str,
    pass: &'r str,
    debug: bool,
    report: &'r mut FrameReport,
}

impl PassScope<'_> {
    fn fail(
        &mut self,
        operation: RenderOperation,
        draw_command: Option<usize>,
        error: &Error,
        details: impl FnOnce() -> String,
    ) {
        let failure = RenderFailure {
            technique: self.technique.to_string(),
            pass: self.pass.to_string(),
            operation,
            draw_command,
            message: error.to_string(),
        };
        engine_warn!(LOG_SOURCE, "{}", failure);
        if self.debug {
            engine_debug!(LOG_SOURCE, "  {}", details());
        }
        self.report.failures.push(failure);
    }
}

// ===== RENDERER =====

macro_rules! define_render_state_diff {
    ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
        impl<B: RenderBackend> Renderer<B> {
            /// Apply every state of `pipeline` that differs from the cache
            /// (all of them if `force`), in table order
            fn apply_render_states(&mut self, pipeline: &RenderPipeline, force: bool) -> Result<()> {
                $(
                    if force || self.pipeline.$field != pipeline.$field {
                        self.backend
                            .$hook(pipeline.$field)
                            .map_err(|e| state_error(stringify!($variant), e))?;
                        self.pipeline.$field = pipeline.$field;
                    }
                )*
                Ok(())
            }
        }
    };
}

crate::for_each_render_state!(define_render_state_diff);

fn state_error(state: &str, error: Error) -> Error {
    match error {
        Error::BackendError(message) => Error::BackendError(format!("{}: {}", state, message)),
        other => other,
    }
}

/// State-diff engine driving a `RenderBackend`
///
/// # Example
///
/// ```ignore
/// let mut renderer = Renderer::new(backend, RenderOptions::default());
/// renderer.set_render_pipeline(&RenderPipeline::with_program(program))?;
/// renderer.set_render_pipeline(&RenderPipeline::with_program(program))?; // no hook called
/// ```
pub struct Renderer<B: RenderBackend> {
    backend: B,
    options: RenderOptions,
    pipeline: RenderPipeline,
    vertex_data: Option<VertexDataHandle>,
    textures: BTreeMap<u32, TextureHandle>,
    uniforms: FxHashMap<ProgramHandle, FxHashMap<String, UniformVariable>>,
    viewport: Option<(i32, i32, i32, i32)>,
    force_pipeline_update: bool,
}

impl<B: RenderBackend> Renderer<B> {
    /// Create a renderer in the Uninitialized state
    ///
    /// The first `set_render_pipeline` call resynchronizes every state.
    pub fn new(backend: B, options: RenderOptions) -> Self {
        Self {
            backend,
            options,
            pipeline: RenderPipeline::default(),
            vertex_data: None,
            textures: BTreeMap::new(),
            uniforms: FxHashMap::default(),
            viewport: None,
            force_pipeline_update: true,
        }
    }

    // ===== ACCESSORS =====

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Last pipeline applied to the backend
    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Texture units last applied to the backend
    pub fn textures(&self) -> &BTreeMap<u32, TextureHandle> {
        &self.textures
    }

    pub fn vertex_data(&self) -> Option<VertexDataHandle> {
        self.vertex_data
    }

    /// Last applied value of uniform `name` of `program`
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<&UniformVariable> {
        self.uniforms.get(&program).and_then(|u| u.get(name))
    }

    /// False until a `set_render_pipeline` call completes after construction or `reset`
    pub fn is_synchronized(&self) -> bool {
        !self.force_pipeline_update
    }

    // ===== CACHE CONTROL =====

    /// Invalidate the whole cache
    ///
    /// Use after a context switch or backend re-initialization, when the
    /// real backend state is unknown. The next `set_render_pipeline`
    /// invokes every pipeline hook unconditionally.
    pub fn reset(&mut self) {
        self.force_pipeline_update = true;
        self.pipeline.reset();
        self.vertex_data = None;
        self.textures.clear();
        self.uniforms.clear();
        self.viewport = None;
    }

    /// Forget the uniforms applied to `program`
    ///
    /// The next `set_uniform_variable` calls for `program` reach the
    /// backend even if the value did not change.
    pub fn reset_uniforms(&mut self, program: ProgramHandle) {
        if let Some(uniforms) = self.uniforms.get_mut(&program) {
            uniforms.clear();
        }
    }

    // ===== STATE DIFFING =====

    /// Apply `pipeline`, calling hooks only for what changed
    ///
    /// The program is always handled first. On the first failing hook the
    /// call stops: states already applied stay cached, the remaining ones
    /// are untouched. A pending full resynchronization stays armed until a
    /// call completes.
    pub fn set_render_pipeline(&mut self, pipeline: &RenderPipeline) -> Result<()> {
        let force = self.force_pipeline_update;

        if force || self.pipeline.program != pipeline.program {
            self.backend
                .program_changed(pipeline.program)
                .map_err(|e| state_error("Program", e))?;
            self.pipeline.program = pipeline.program;
        }

        self.apply_render_states(pipeline, force)?;

        self.force_pipeline_update = false;
        Ok(())
    }

    /// Apply uniform `name` of `program` if it differs from the cached value
    pub fn set_uniform_variable(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: &UniformVariable,
    ) -> Result<()> {
        let cached = self.uniforms.entry(program).or_default();
        if cached.get(name) == Some(value) {
            return Ok(());
        }
        self.backend.uniform_variable_changed(program, name, value)?;
        cached.insert(name.to_string(), value.clone());
        Ok(())
    }

    /// Apply every uniform of `uniforms` to `program`
    ///
    /// Stops at the first rejected uniform.
    pub fn set_uniform_variables(
        &mut self,
        program: ProgramHandle,
        uniforms: &FxHashMap<String, UniformVariable>,
    ) -> Result<()> {
        for (name, value) in uniforms {
            self.set_uniform_variable(program, name, value)?;
        }
        Ok(())
    }

    /// Bring the bound texture units in line with `textures`
    ///
    /// Per unit: same texture bound, nothing; different texture or newly
    /// requested unit, bind it; bound unit absent from the request,
    /// disable it. Enables are issued before disables, each in unit order.
    pub fn set_textures(&mut self, textures: &BTreeMap<u32, TextureHandle>) -> Result<()> {
        if self.textures == *textures {
            return Ok(());
        }

        for (&unit, &texture) in textures {
            if self.textures.get(&unit) != Some(&texture) {
                self.backend.texture_changed(unit, texture, true)?;
                self.textures.insert(unit, texture);
            }
        }

        let stale: Vec<(u32, TextureHandle)> = self
            .textures
            .iter()
            .filter(|(unit, _)| !textures.contains_key(unit))
            .map(|(&unit, &texture)| (unit, texture))
            .collect();

        for (unit, texture) in stale {
            self.backend.texture_changed(unit, texture, false)?;
            self.textures.remove(&unit);
        }

        Ok(())
    }

    /// Bind `vertex_data` unless it is already bound
    pub fn set_vertex_data(&mut self, vertex_data: VertexDataHandle, bind_for_drawing: bool) -> Result<()> {
        if self.vertex_data == Some(vertex_data) {
            return Ok(());
        }
        self.backend.vertex_data_changed(vertex_data, bind_for_drawing)?;
        self.vertex_data = Some(vertex_data);
        Ok(())
    }

    /// Apply `viewport` with a single hook call if any coordinate changed
    pub fn set_viewport(&mut self, viewport: &Viewport) -> Result<()> {
        let geometry = viewport.geometry();
        if self.viewport == Some(geometry) {
            return Ok(());
        }
        let (x, y, width, height) = geometry;
        self.backend.viewport_changed(x, y, width, height)?;
        self.viewport = Some(geometry);
        Ok(())
    }

    // ===== FRAME RENDERING =====

    /// Render one frame
    ///
    /// Every pass of every technique is rendered in order. Rejected
    /// operations never abort the frame: a failing pipeline, viewport or
    /// missing camera skips the pass, a failing draw-command step skips
    /// that command only. Every failure is logged and listed in the
    /// returned report.
    pub fn render(&mut self, command: &RenderCommand) -> FrameReport {
        let mut report = FrameReport::default();

        let Some(target) = command.target() else {
            let mut scope = PassScope {
                technique: "",
                pass: "",
                debug: self.options.debug,
                report: &mut report,
            };
            scope.fail(
                RenderOperation::MissingTarget,
                None,
                &Error::InitializationFailed("no render target set".to_string()),
                || "render command without target".to_string(),
            );
            return report;
        };

        for technique in command.techniques() {
            let technique: &dyn RenderTechnique = technique.as_ref();
            technique.render(&mut |pass: &dyn RenderPass| {
                let mut scope = PassScope {
                    technique: technique.name(),
                    pass: pass.name(),
                    debug: self.options.debug,
                    report: &mut report,
                };
                self.render_pass(command, target.as_ref(), pass, &mut scope);
            });
        }

        report
    }

    fn render_pass(
        &mut self,
        command: &RenderCommand,
        target: &dyn RenderTarget,
        pass: &dyn RenderPass,
        scope: &mut PassScope<'_>,
    ) {
        let Some(viewport) = target.viewport() else {
            let error = Error::InitializationFailed(format!("no viewport set on '{}'", target.name()));
            scope.fail(RenderOperation::MissingViewport, None, &error, || target.name().to_string());
            return;
        };

        let mut ctx = DrawCallContext::new(
            viewport,
            target,
            command.global_state(),
            command.draw_commands(),
        );
        pass.set_up(&mut ctx);

        // Clears are independent calls; a failed clear does not stop the pass
        let clears = [
            (ClearBuffers::COLOR, RenderOperation::ClearColorBuffer),
            (ClearBuffers::DEPTH, RenderOperation::ClearDepthBuffer),
            (ClearBuffers::STENCIL, RenderOperation::ClearStencilBuffer),
        ];
        for (buffer, operation) in clears {
            if !ctx.clear.contains(buffer) {
                continue;
            }
            let result = match operation {
                RenderOperation::ClearColorBuffer => self.backend.clear_color_buffer(),
                RenderOperation::ClearDepthBuffer => self.backend.clear_depth_buffer(),
                _ => self.backend.clear_stencil_buffer(),
            };
            if let Err(e) = result {
                scope.fail(operation, None, &e, || format!("buffers = {:?}", ctx.clear));
            }
        }

        if let Err(e) = self.set_render_pipeline(&ctx.pipeline) {
            scope.fail(RenderOperation::SetRenderPipeline, None, &e, || ctx.pipeline.to_string());
            return;
        }

        if let Err(e) = self.set_viewport(&ctx.viewport) {
            scope.fail(RenderOperation::SetViewport, None, &e, || ctx.viewport.to_string());
            return;
        }

        if let Some(program) = self.pipeline.program {
            self.bind_pass_uniforms(program, &ctx, &mut |name, value, e| {
                scope.fail(RenderOperation::SetUniform, None, &e, || format!("{} = {}", name, value));
            });
        }

        let Some(camera) = ctx.viewport.camera() else {
            let error = Error::InitializationFailed("no camera set on viewport".to_string());
            scope.fail(RenderOperation::MissingCamera, None, &error, || ctx.viewport.to_string());
            return;
        };
        let view_projection = match camera.lock() {
            Ok(camera) => camera.view_projection_matrix(),
            Err(_) => {
                let error = Error::LockPoisoned("viewport camera".to_string());
                scope.fail(RenderOperation::MissingCamera, None, &error, || ctx.viewport.to_string());
                return;
            }
        };

        for (index, draw_command) in ctx.draw_commands.iter().enumerate() {
            if let Err((operation, e)) = self.issue_draw_command(&ctx, draw_command, &view_projection) {
                scope.fail(operation, Some(index), &e, || draw_command.to_string());
            }
        }

        pass.tear_down(&ctx);
    }

    /// Reset the uniforms of `program`, then bind the shared, per-program
    /// and pass uniforms to it, in that order
    ///
    /// Every uniform is tried; rejected ones go to `on_error`.
    fn bind_pass_uniforms(
        &mut self,
        program: ProgramHandle,
        ctx: &DrawCallContext<'_>,
        on_error: &mut dyn FnMut(&str, &UniformVariable, Error),
    ) {
        self.reset_uniforms(program);

        let global = ctx.global_state;
        let pass_uniforms = global
            .shared_uniforms()
            .iter()
            .chain(global.per_program_uniforms(program).into_iter().flatten())
            .chain(ctx.uniforms.iter());

        for (name, value) in pass_uniforms {
            if let Err(e) = self.set_uniform_variable(program, name, value) {
                on_error(name, value, e);
            }
        }
    }

    /// Apply everything `command` needs and draw it
    ///
    /// A draw command whose pipeline switches programs gets the pass
    /// uniforms bound to the new program before its own.
    fn issue_draw_command(
        &mut self,
        ctx: &DrawCallContext<'_>,
        command: &DrawCommand,
        view_projection: &Mat4,
    ) -> std::result::Result<(), (RenderOperation, Error)> {
        let previous_program = self.pipeline.program;
        let pipeline = command.pipeline().unwrap_or(&ctx.pipeline);
        self.set_render_pipeline(pipeline)
            .map_err(|e| (RenderOperation::SetRenderPipeline, e))?;

        if let Some(program) = self.pipeline.program {
            if previous_program != Some(program) {
                let mut rejected = None;
                self.bind_pass_uniforms(program, ctx, &mut |_, _, e| {
                    rejected.get_or_insert(e);
                });
                if let Some(e) = rejected {
                    return Err((RenderOperation::SetUniform, e));
                }
            }

            for (name, value) in command.uniforms() {
                self.set_uniform_variable(program, name, value)
                    .map_err(|e| (RenderOperation::SetUniform, e))?;
            }

            let mvp = UniformVariable::Mat4(*view_projection * *command.model_matrix());
            self.set_uniform_variable(program, MVP_UNIFORM, &mvp)
                .map_err(|e| (RenderOperation::SetUniform, e))?;
        }

        self.set_textures(command.textures())
            .map_err(|e| (RenderOperation::SetTextures, e))?;

        self.set_vertex_data(command.vertex_data(), true)
            .map_err(|e| (RenderOperation::SetVertexData, e))?;

        self.backend
            .draw(command)
            .map_err(|e| (RenderOperation::Draw, e))
    }
}

impl<B: RenderBackend> fmt::Display for Renderer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Renderer[")?;
        writeln!(f, "  synchronized = {},", self.is_synchronized())?;
        for line in self.pipeline.to_string().lines() {
            writeln!(f, "  {}", line)?;
        }
        match self.vertex_data {
            Some(data) => writeln!(f, "  vertex_data = {:?},", data)?,
            None => writeln!(f, "  vertex_data = null,")?,
        }
        for (unit, texture) in &self.textures {
            writeln!(f, "  texture[{}] = {:?},", unit, texture)?;
        }
        match self.viewport {
            Some((x, y, w, h)) => writeln!(f, "  viewport = ({}, {}, {}, {}),", x, y, w, h)?,
            None => writeln!(f, "  viewport = unset,")?,
        }
        for (program, uniforms) in &self.uniforms {
            let mut names: Vec<&String> = uniforms.keys().collect();
            names.sort();
            writeln!(f, "  uniforms of {:?} = {:?},", program, names)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
