/// Engine configuration
///
/// Plain configuration objects passed explicitly to the `Renderer` and the
/// `Engine`. There is no global options registry.

use crate::scene::ExecutionPolicy;

/// Options of a `Renderer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Log the arguments of every rejected backend call at DEBUG level
    pub debug: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            debug: cfg!(debug_assertions),
        }
    }
}

/// Configuration of an `Engine`
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Application name, used in logs
    pub name: String,

    /// Options forwarded to renderers created for this engine
    pub render: RenderOptions,

    /// Traversal policy of the per-frame scene update
    pub update_policy: ExecutionPolicy,

    /// Traversal policy of draw-command collection
    ///
    /// `Sequential` keeps draw order identical to scene order.
    pub collect_policy: ExecutionPolicy,

    /// Fixed simulation time step in seconds
    pub time_step: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "Sequoia".to_string(),
            render: RenderOptions::default(),
            update_policy: ExecutionPolicy::Parallel,
            collect_policy: ExecutionPolicy::Sequential,
            time_step: 1.0 / 60.0,
        }
    }
}
