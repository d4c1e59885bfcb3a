//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platforms translate their native events into `InputEvent`s.

mod frame;
mod state;
mod types;

pub(crate) mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
