/*!
# Sequoia Engine - Null Renderer Backend

A render system that accepts every well-formed call and draws nothing.

It implements every `RenderBackend` hook of `sequoia_engine`, mirrors the
state the renderer applied and counts the calls, which makes it the
backend of choice for headless runs and for checking that the renderer
never issues redundant state changes.
*/

mod null_backend;
mod null_stats;
mod null_render_system;

pub use null_backend::{NullBackend, DEFAULT_TEXTURE_UNITS};
pub use null_stats::NullStats;
pub use null_render_system::NullRenderSystem;

// Namespace mirroring the core crate's `sequoia` module
pub mod sequoia {
    pub use crate::null_backend::{NullBackend, DEFAULT_TEXTURE_UNITS};
    pub use crate::null_stats::NullStats;
    pub use crate::null_render_system::NullRenderSystem;
}
