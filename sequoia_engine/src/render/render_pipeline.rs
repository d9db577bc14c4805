/// Render pipeline: the full set of fixed-function states plus the program.
///
/// The struct fields, defaults, `reset` and the diagnostic string are all
/// generated from `for_each_render_state!`, so the pipeline can never drift
/// from the backend hooks generated from the same table.

use std::fmt;
use super::resource::ProgramHandle;

macro_rules! define_render_pipeline {
    ($( $(#[$doc:meta])* $variant:ident, $field:ident, $hook:ident : $ty:ty = $default:expr; )*) => {
        /// State of the render pipeline
        ///
        /// Two pipelines are state-equal iff the program and every state
        /// compare equal.
        #[derive(Debug, Clone, PartialEq)]
        pub struct RenderPipeline {
            /// GPU program, `None` for no program
            pub program: Option<ProgramHandle>,
            $(
                $(#[$doc])*
                pub $field: $ty,
            )*
        }

        impl RenderPipeline {
            /// Restore every state to its declared default and clear the program
            pub fn reset(&mut self) {
                self.program = None;
                $( self.$field = $default; )*
            }
        }

        impl Default for RenderPipeline {
            fn default() -> Self {
                Self {
                    program: None,
                    $( $field: $default, )*
                }
            }
        }

        impl fmt::Display for RenderPipeline {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                writeln!(f, "RenderPipeline[")?;
                match self.program {
                    Some(program) => writeln!(f, "  Program = {:?},", program)?,
                    None => writeln!(f, "  Program = null,")?,
                }
                $( writeln!(f, "  {} = {},", stringify!($variant), self.$field)?; )*
                write!(f, "]")
            }
        }
    };
}

crate::for_each_render_state!(define_render_pipeline);

impl RenderPipeline {
    /// Default pipeline using `program`
    pub fn with_program(program: ProgramHandle) -> Self {
        Self {
            program: Some(program),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "render_pipeline_tests.rs"]
mod tests;
