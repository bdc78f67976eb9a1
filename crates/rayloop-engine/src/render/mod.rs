//! Rendering subsystem.
//!
//! The frame renderer draws into a CPU `PixelSurface`; `SurfacePresenter` uploads
//! that surface to a GPU texture and stretches it over the window.

mod ctx;
mod pixels;
mod present;

pub use ctx::{RenderCtx, RenderTarget};
pub use pixels::{PixelSurface, BYTES_PER_PIXEL};
pub use present::SurfacePresenter;
