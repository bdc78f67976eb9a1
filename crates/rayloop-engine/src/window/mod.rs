//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and hosts a `RenderLoop` on them: key events
//! feed the loop's input state, and each armed tick runs on the next redraw.

mod runtime;

pub use runtime::{RedrawScheduler, Runtime, RuntimeConfig};
