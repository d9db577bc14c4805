/// Render targets: where a frame ends up (window surface, off-screen buffer).

use std::sync::RwLock;
use crate::error::{Error, Result};
use super::camera::SharedCamera;
use super::viewport::Viewport;

/// Destination of a `RenderCommand`
pub trait RenderTarget: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;

    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Snapshot of the viewport rendered into, if any
    fn viewport(&self) -> Option<Viewport>;
}

#[derive(Debug)]
struct TargetState {
    width: u32,
    height: u32,
    viewport: Option<Viewport>,
}

/// Window-agnostic target covered by a single full-size viewport
#[derive(Debug)]
pub struct DefaultRenderTarget {
    name: String,
    state: RwLock<TargetState>,
}

impl DefaultRenderTarget {
    /// Target of `width` x `height` with a full-size viewport and no camera
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(TargetState {
                width,
                height,
                viewport: Some(Viewport::new(0, 0, width as i32, height as i32)),
            }),
        }
    }

    /// Replace (or remove) the viewport
    pub fn set_viewport(&self, viewport: Option<Viewport>) -> Result<()> {
        self.write_state()?.viewport = viewport;
        Ok(())
    }

    /// Attach `camera` to the viewport
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if the target has no viewport.
    pub fn set_camera(&self, camera: SharedCamera) -> Result<()> {
        let mut state = self.write_state()?;
        let viewport = state.viewport.as_mut().ok_or_else(|| {
            Error::InitializationFailed(format!("render target '{}' has no viewport", self.name))
        })?;
        viewport.set_camera(camera)
    }

    /// Resize the target; the viewport is stretched to cover it
    pub fn resize(&self, width: u32, height: u32) -> Result<()> {
        let mut state = self.write_state()?;
        state.width = width;
        state.height = height;
        if let Some(viewport) = state.viewport.as_mut() {
            viewport.update_geometry(0, 0, width as i32, height as i32)?;
        }
        Ok(())
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, TargetState>> {
        self.state
            .write()
            .map_err(|_| Error::LockPoisoned(format!("render target '{}'", self.name)))
    }
}

impl RenderTarget for DefaultRenderTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.state.read().map(|s| s.width).unwrap_or(0)
    }

    fn height(&self) -> u32 {
        self.state.read().map(|s| s.height).unwrap_or(0)
    }

    fn viewport(&self) -> Option<Viewport> {
        self.state.read().ok().and_then(|s| s.viewport.clone())
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
