/// Null backend statistics - counts every hook the renderer called
///
/// The null backend draws nothing, so its counters are the only observable
/// effect of a frame. They make redundant state changes visible: a scene
/// rendered twice without changes should add draws and uniform uploads but
/// no pipeline or texture calls.

use std::fmt;
use colored::*;

/// Counters of accepted backend calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullStats {
    /// `program_changed` calls
    pub program_changes: u64,
    /// Fixed-function state hook calls (`depth_test_changed`, ...)
    pub state_changes: u64,
    /// `vertex_data_changed` calls
    pub vertex_data_binds: u64,
    /// `texture_changed` calls enabling a unit
    pub texture_binds: u64,
    /// `texture_changed` calls disabling a unit
    pub texture_unbinds: u64,
    /// `uniform_variable_changed` calls
    pub uniform_uploads: u64,
    /// `viewport_changed` calls
    pub viewport_changes: u64,
    /// Color, depth and stencil clears
    pub clears: u64,
    /// `draw` calls
    pub draws: u64,
    /// Calls refused by the backend
    pub rejected: u64,
}

impl NullStats {
    /// Every accepted call, all hooks together
    pub fn total(&self) -> u64 {
        self.program_changes
            + self.state_changes
            + self.vertex_data_binds
            + self.texture_binds
            + self.texture_unbinds
            + self.uniform_uploads
            + self.viewport_changes
            + self.clears
            + self.draws
    }

    /// Counters accumulated since `earlier` was taken
    pub fn since(&self, earlier: &NullStats) -> NullStats {
        NullStats {
            program_changes: self.program_changes - earlier.program_changes,
            state_changes: self.state_changes - earlier.state_changes,
            vertex_data_binds: self.vertex_data_binds - earlier.vertex_data_binds,
            texture_binds: self.texture_binds - earlier.texture_binds,
            texture_unbinds: self.texture_unbinds - earlier.texture_unbinds,
            uniform_uploads: self.uniform_uploads - earlier.uniform_uploads,
            viewport_changes: self.viewport_changes - earlier.viewport_changes,
            clears: self.clears - earlier.clears,
            draws: self.draws - earlier.draws,
            rejected: self.rejected - earlier.rejected,
        }
    }

    /// Print a colored summary to stdout
    pub fn print_report(&self) {
        if self.total() == 0 && self.rejected == 0 {
            println!("\n{}", "No backend calls".green().bold());
            return;
        }

        println!("\n{}", "=== Null Backend Statistics ===".bright_blue().bold());
        println!("  {} {}", "Draws:".white().bold(), self.draws);
        println!("  {} {}", "Program changes:".cyan(), self.program_changes);
        println!("  {} {}", "State changes:".cyan(), self.state_changes);
        println!("  {} {}", "Vertex data binds:".cyan(), self.vertex_data_binds);
        println!(
            "  {} {} / {}",
            "Texture binds / unbinds:".cyan(),
            self.texture_binds,
            self.texture_unbinds
        );
        println!("  {} {}", "Uniform uploads:".cyan(), self.uniform_uploads);
        println!("  {} {}", "Viewport changes:".cyan(), self.viewport_changes);
        println!("  {} {}", "Clears:".cyan(), self.clears);
        if self.rejected > 0 {
            println!("  {} {}", "Rejected:".red().bold(), self.rejected);
        }
        println!("{}\n", "===============================".bright_blue().bold());
    }
}

impl fmt::Display for NullStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NullStats[draws = {}, programs = {}, states = {}, vertex data = {}, textures = {}/{}, uniforms = {}, viewports = {}, clears = {}, rejected = {}]",
            self.draws,
            self.program_changes,
            self.state_changes,
            self.vertex_data_binds,
            self.texture_binds,
            self.texture_unbinds,
            self.uniform_uploads,
            self.viewport_changes,
            self.clears,
            self.rejected
        )
    }
}
