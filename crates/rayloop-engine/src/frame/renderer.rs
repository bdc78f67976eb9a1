use anyhow::Result;

use crate::coords::{CameraPosition, SurfaceSize};
use crate::render::PixelSurface;

/// Arguments of one render call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderRequest {
    pub x: i32,
    pub y: i32,
    /// Tick timestamp in milliseconds.
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
}

impl RenderRequest {
    pub fn new(position: CameraPosition, timestamp: f64, size: SurfaceSize) -> Self {
        Self {
            x: position.x,
            y: position.y,
            timestamp,
            width: size.width,
            height: size.height,
        }
    }
}

/// External frame renderer driven once per tick.
///
/// Its only effect is on the surface it is given. A renderer may report itself not
/// ready (e.g. its backing module is still loading); ticks in that state skip the
/// call rather than queueing it.
pub trait FrameRenderer {
    fn is_ready(&mut self) -> bool;

    fn render(&mut self, request: &RenderRequest, surface: &mut PixelSurface) -> Result<()>;
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for Box<R> {
    fn is_ready(&mut self) -> bool {
        (**self).is_ready()
    }

    fn render(&mut self, request: &RenderRequest, surface: &mut PixelSurface) -> Result<()> {
        (**self).render(request, surface)
    }
}
