/// Null render system - resource registry plus a renderer on the null backend
///
/// The stand-in for a windowed render system: it owns the resources the
/// scene refers to and the renderer that replays frames against them.

use sequoia_engine::sequoia::render::{
    DrawMode, FrameReport, ProgramDesc, ProgramHandle, RenderCommand, Renderer, ResourceRegistry,
    TextureDesc, TextureHandle, VertexDataDesc, VertexDataHandle,
};
use sequoia_engine::sequoia::{Engine, RenderOptions, Result};
use sequoia_engine::engine_info;
use crate::null_backend::NullBackend;
use crate::null_stats::NullStats;

pub struct NullRenderSystem {
    registry: ResourceRegistry,
    renderer: Renderer<NullBackend>,
}

impl NullRenderSystem {
    pub fn new(options: RenderOptions) -> Self {
        Self::with_backend(NullBackend::new(), options)
    }

    pub fn with_backend(backend: NullBackend, options: RenderOptions) -> Self {
        engine_info!(
            "sequoia::NullRenderSystem",
            "created ({} texture units, debug = {})",
            backend.texture_units(),
            options.debug
        );
        Self {
            registry: ResourceRegistry::new(),
            renderer: Renderer::new(backend, options),
        }
    }

    // ===== RESOURCES =====

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.registry
    }

    pub fn create_program(&mut self, name: &str) -> Result<ProgramHandle> {
        self.registry.create_program(ProgramDesc { name: name.to_string() })
    }

    pub fn create_texture(&mut self, name: &str, width: u32, height: u32) -> Result<TextureHandle> {
        self.registry.create_texture(TextureDesc {
            name: name.to_string(),
            width,
            height,
        })
    }

    /// Non-indexed triangle list of `vertex_count` vertices
    pub fn create_mesh(&mut self, name: &str, vertex_count: u32) -> Result<VertexDataHandle> {
        self.registry.create_vertex_data(VertexDataDesc {
            name: name.to_string(),
            draw_mode: DrawMode::Triangles,
            vertex_count,
            index_count: 0,
        })
    }

    // ===== RENDERING =====

    pub fn renderer(&self) -> &Renderer<NullBackend> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<NullBackend> {
        &mut self.renderer
    }

    pub fn backend(&self) -> &NullBackend {
        self.renderer.backend()
    }

    pub fn stats(&self) -> &NullStats {
        self.renderer.backend().stats()
    }

    pub fn render(&mut self, command: &RenderCommand) -> FrameReport {
        self.renderer.render(command)
    }

    /// Run one engine frame on this system's renderer
    pub fn run_frame(&mut self, engine: &mut Engine) -> Result<FrameReport> {
        engine.frame(&mut self.renderer)
    }
}

impl Default for NullRenderSystem {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
