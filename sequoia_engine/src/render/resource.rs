/// GPU resource handles and the registry that owns their descriptions.
///
/// Programs, textures and vertex data are owned by the backend side. The
/// render core only ever holds `Copy` identity handles and compares them
/// for change detection; it never creates or destroys the underlying GPU
/// objects itself.

use std::fmt;
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::engine_error;

// ===== HANDLES =====

new_key_type! {
    /// Identity of a GPU program
    pub struct ProgramHandle;

    /// Identity of a texture
    pub struct TextureHandle;

    /// Identity of a vertex/index buffer pair
    pub struct VertexDataHandle;
}

// ===== DESCRIPTORS =====

/// Description of a linked GPU program
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDesc {
    /// Debug name
    pub name: String,
}

/// Description of a 2D texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Debug name (usually the image path)
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Description of a vertex/index buffer pair
#[derive(Debug, Clone, PartialEq)]
pub struct VertexDataDesc {
    /// Debug name
    pub name: String,
    /// Primitive assembly mode
    pub draw_mode: DrawMode,
    /// Number of vertices (must be > 0)
    pub vertex_count: u32,
    /// Number of indices (0 = non-indexed draw)
    pub index_count: u32,
}

impl VertexDataDesc {
    /// Whether draws use the index buffer
    pub fn is_indexed(&self) -> bool {
        self.index_count > 0
    }
}

// ===== REGISTRY =====

/// Owner-side store mapping handles to their descriptions
///
/// Backends keep one registry per render system. Handles stay valid
/// until their resource is removed; a removed handle never aliases a
/// new resource.
#[derive(Default)]
pub struct ResourceRegistry {
    programs: SlotMap<ProgramHandle, ProgramDesc>,
    textures: SlotMap<TextureHandle, TextureDesc>,
    vertex_data: SlotMap<VertexDataHandle, VertexDataDesc>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // ===== PROGRAMS =====

    /// Register a program
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if the name is empty.
    pub fn create_program(&mut self, desc: ProgramDesc) -> Result<ProgramHandle> {
        if desc.name.is_empty() {
            return Err(Error::InvalidResource("program name is empty".to_string()));
        }
        Ok(self.programs.insert(desc))
    }

    pub fn program(&self, handle: ProgramHandle) -> Option<&ProgramDesc> {
        self.programs.get(handle)
    }

    pub fn remove_program(&mut self, handle: ProgramHandle) -> Option<ProgramDesc> {
        self.programs.remove(handle)
    }

    // ===== TEXTURES =====

    /// Register a texture
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if the name is empty or a
    /// dimension is zero.
    pub fn create_texture(&mut self, desc: TextureDesc) -> Result<TextureHandle> {
        if desc.name.is_empty() {
            return Err(Error::InvalidResource("texture name is empty".to_string()));
        }
        if desc.width == 0 || desc.height == 0 {
            return Err(invalid_resource(format!(
                "texture '{}' has zero size ({}x{})",
                desc.name, desc.width, desc.height
            )));
        }
        Ok(self.textures.insert(desc))
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureDesc> {
        self.textures.get(handle)
    }

    pub fn remove_texture(&mut self, handle: TextureHandle) -> Option<TextureDesc> {
        self.textures.remove(handle)
    }

    // ===== VERTEX DATA =====

    /// Register vertex data
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if the name is empty or the
    /// vertex count is zero.
    pub fn create_vertex_data(&mut self, desc: VertexDataDesc) -> Result<VertexDataHandle> {
        if desc.name.is_empty() {
            return Err(Error::InvalidResource("vertex data name is empty".to_string()));
        }
        if desc.vertex_count == 0 {
            return Err(invalid_resource(format!(
                "vertex data '{}' has no vertices",
                desc.name
            )));
        }
        Ok(self.vertex_data.insert(desc))
    }

    pub fn vertex_data(&self, handle: VertexDataHandle) -> Option<&VertexDataDesc> {
        self.vertex_data.get(handle)
    }

    pub fn remove_vertex_data(&mut self, handle: VertexDataHandle) -> Option<VertexDataDesc> {
        self.vertex_data.remove(handle)
    }

    // ===== STATS =====

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn vertex_data_count(&self) -> usize {
        self.vertex_data.len()
    }

    /// Human readable name of a program handle, `"null"` if unknown
    pub fn describe_program(&self, handle: Option<ProgramHandle>) -> String {
        handle
            .and_then(|h| self.programs.get(h))
            .map(|desc| format!("Program[{}]", desc.name))
            .unwrap_or_else(|| "null".to_string())
    }

    /// Human readable name of a texture handle, `"null"` if unknown
    pub fn describe_texture(&self, handle: TextureHandle) -> String {
        self.textures
            .get(handle)
            .map(|desc| format!("Texture[{}, {}x{}]", desc.name, desc.width, desc.height))
            .unwrap_or_else(|| "null".to_string())
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("programs", &self.programs.len())
            .field("textures", &self.textures.len())
            .field("vertex_data", &self.vertex_data.len())
            .finish()
    }
}

fn invalid_resource(message: String) -> Error {
    engine_error!("sequoia::ResourceRegistry", "{}", message);
    Error::InvalidResource(message)
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
