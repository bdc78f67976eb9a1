//! Rayloop engine crate.
//!
//! This crate owns the frame loop (timing, input, scheduling) and the platform + GPU
//! runtime pieces that host it in a window.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod frame;

pub mod logging;
pub mod coords;
pub mod render;
