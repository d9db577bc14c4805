/*!
# Sequoia Engine

Core types for the Sequoia 3D engine: a backend-agnostic render-command
pipeline.

Each frame the scene graph is updated, the active drawables publish an
immutable draw command, and the `Renderer` replays them against a
`RenderBackend`, calling it only for the state that actually changed.
Backends (the no-op `sequoia_engine_renderer_null`, or a real graphics API)
implement the hooks of `RenderBackend`.

## Architecture

- **Renderer**: state-diff engine caching pipeline, textures, vertex data and uniforms
- **RenderPipeline**: render states generated from a single declarative table
- **DrawCommand**: one drawable's model matrix, vertex data, textures and uniforms
- **RenderCommand**: target, techniques, draw commands and global uniforms of a frame
- **SceneGraph**: node hierarchy traversed sequentially or on the rayon pool
- **Engine**: frame driver tying the scene to a renderer
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod render;
pub mod scene;
pub mod utils;

// Main sequoia namespace module
pub mod sequoia {
    // Error types
    pub use crate::error::{Error, Result};

    // Frame driver and its configuration
    pub use crate::engine::Engine;
    pub use crate::config::{EngineConfig, RenderOptions};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            log, log_detailed, reset_logger, set_logger, DefaultLogger, LogEntry, LogSeverity, Logger,
        };
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::render::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Utilities
    pub mod utils {
        pub use crate::utils::*;
    }
}

// Re-export math library at crate root
pub use glam;
