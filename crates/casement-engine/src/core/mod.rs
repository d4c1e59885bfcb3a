//! Contracts between the shell's frame loop and the code it drives.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
