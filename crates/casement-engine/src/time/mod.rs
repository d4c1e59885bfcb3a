//! Frame timing.
//!
//! The shell owns one `FrameClock` and ticks it once per loop iteration.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
