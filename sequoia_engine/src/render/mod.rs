/// Render module - state diffing between draw commands and a backend

// Module declarations
pub mod render_state;
pub mod uniform_variable;
pub mod resource;
pub mod render_pipeline;
pub mod draw_command;
pub mod camera;
pub mod viewport;
pub mod render_target;
pub mod global_render_state;
pub mod render_command;
pub mod technique;
pub mod backend;
pub mod renderer;

#[cfg(test)]
pub(crate) mod mock_backend;

// Re-export everything
pub use render_state::*;
pub use uniform_variable::*;
pub use resource::*;
pub use render_pipeline::*;
pub use draw_command::*;
pub use camera::*;
pub use viewport::*;
pub use render_target::*;
pub use global_render_state::*;
pub use render_command::*;
pub use technique::*;
pub use backend::*;
pub use renderer::*;
