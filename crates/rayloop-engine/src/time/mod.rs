//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `MonotonicClock` per host, sampled once per tick
//! - one `FrameClock` per render loop, fed with those samples

mod frame_clock;
mod monotonic;

pub use frame_clock::{FrameClock, FrameRate, DEFAULT_NOTIFY_INTERVAL_MS};
pub use monotonic::MonotonicClock;
