use crate::error::VizError;
use crate::scene::Scene;

/// Whatever draws the scene: WebGL2 in the browser, a counter in tests.
pub trait SceneRenderer {
    /// Logical output size in CSS pixels.
    fn set_size(&mut self, width: u32, height: u32);
    fn size(&self) -> (u32, u32);
    fn render(&mut self, scene: &Scene) -> Result<(), VizError>;
}

/// Renderer that draws nothing and only remembers what it was asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessRenderer {
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    /// Group rotation seen by the most recent render.
    pub last_rotation: Option<glam::Vec3>,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(&mut self, scene: &Scene) -> Result<(), VizError> {
        self.frames += 1;
        self.last_rotation = Some(scene.group.rotation);
        Ok(())
    }
}
