//! Coordinate and size types shared by the loop and the renderers.
//!
//! Canonical space:
//! - Integer pixels
//! - Origin top-left
//! - +X right, +Y down

mod position;
mod size;

pub use position::CameraPosition;
pub use size::SurfaceSize;
