//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s
//! (see `platform::winit`).

mod bindings;
mod state;
mod types;

pub mod platform;

pub use bindings::KeyBindings;
pub use state::{InputState, ReleasePolicy};
pub use types::{Direction, DirectionFlags, InputEvent, Key, KeyState};
