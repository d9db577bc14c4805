/// Render states: the declarative table every pipeline toggle comes from.
///
/// Each row of `for_each_render_state!` declares one state as
/// `Variant, field, hook : Type = default;`. The table is consumed by
/// callback macros that generate the `RenderPipeline` fields, their
/// defaults and diagnostics, the matching `RenderBackend` hooks and the
/// diffing code of the `Renderer`. Adding a state means adding one row.

use std::fmt;

/// Expand `$callback!` with the full render-state table.
///
/// The callback receives a sequence of rows of the form
/// `$(#[doc])* Variant, field, hook : Type = default;`.
///
/// # Example
///
/// ```
/// macro_rules! count_states {
///     ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
///         [$(stringify!($variant)),*].len()
///     };
/// }
/// let n = sequoia_engine::for_each_render_state!(count_states);
/// assert_eq!(n, sequoia_engine::render::RENDER_STATE_NAMES.len());
/// ```
#[macro_export]
macro_rules! for_each_render_state {
    ($callback:ident) => {
        $callback! {
            /// Enable depth testing
            DepthTest, depth_test, depth_test_changed : bool = true;
            /// Comparison used by the depth test
            DepthFunc, depth_func, depth_func_changed : $crate::render::DepthFunc = $crate::render::DepthFunc::Less;
            /// Write fragments into the depth buffer
            DepthWrite, depth_write, depth_write_changed : bool = true;
            /// Faces discarded by the rasterizer
            CullFace, cull_face, cull_face_changed : $crate::render::CullMode = $crate::render::CullMode::Back;
            /// Enable color blending
            BlendEnable, blend_enable, blend_enable_changed : bool = false;
        }
    };
}

macro_rules! define_render_state_names {
    ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
        /// Names of every declared render state, in table order
        pub const RENDER_STATE_NAMES: &[&str] = &[$(stringify!($variant)),*];
    };
}

crate::for_each_render_state!(define_render_state_names);

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

impl fmt::Display for DepthFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Front,
    Back,
    FrontAndBack,
}

impl fmt::Display for CullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
