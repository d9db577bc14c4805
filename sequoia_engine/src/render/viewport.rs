/// Viewport: the rectangle of a render target a camera renders into.

use std::fmt;
use crate::error::{Error, Result};
use super::camera::SharedCamera;

/// Rectangle of a render target plus the camera looking through it
///
/// Attaching a camera, or changing the geometry, keeps the camera's
/// aspect ratio in sync with the rectangle.
#[derive(Debug, Clone)]
pub struct Viewport {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    camera: Option<SharedCamera>,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height, camera: None }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// `(x, y, width, height)`
    pub fn geometry(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn camera(&self) -> Option<&SharedCamera> {
        self.camera.as_ref()
    }

    /// Attach `camera` and immediately push the current geometry to it
    pub fn set_camera(&mut self, camera: SharedCamera) -> Result<()> {
        self.camera = Some(camera);
        self.notify_camera()
    }

    pub fn remove_camera(&mut self) -> Option<SharedCamera> {
        self.camera.take()
    }

    /// Change the rectangle and update the attached camera
    pub fn update_geometry(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self.notify_camera()
    }

    fn notify_camera(&self) -> Result<()> {
        let Some(camera) = &self.camera else {
            return Ok(());
        };
        if self.height <= 0 {
            return Ok(());
        }
        let mut camera = camera
            .lock()
            .map_err(|_| Error::LockPoisoned("viewport camera".to_string()))?;
        camera.set_aspect(self.width as f32 / self.height as f32);
        Ok(())
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport[x = {}, y = {}, width = {}, height = {}, camera = {}]",
            self.x,
            self.y,
            self.width,
            self.height,
            if self.camera.is_some() { "set" } else { "null" }
        )
    }
}
