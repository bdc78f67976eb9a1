//! Frame loop orchestration.
//!
//! `RenderLoop` ties the pieces together once per tick:
//! clock → input → camera position → external renderer → re-arm.
//! Hosts supply the scheduling primitive (`Scheduler`), the renderer
//! (`FrameRenderer`) and where published frame rates go (`DisplaySink`).

mod render_loop;
mod renderer;
mod scheduler;
mod sink;

pub use render_loop::{drive_headless, LoopConfig, RenderLoop, TickOutcome};
pub use renderer::{FrameRenderer, RenderRequest};
pub use scheduler::{ManualScheduler, Scheduler};
pub use sink::{DisplaySink, LogSink, RecordingSink};
