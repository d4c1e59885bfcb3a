//! Casement engine crate.
//!
//! A minimal application shell: one window, one graphics context, and a
//! poll / clear / present loop that runs until the window is asked to close.

pub mod core;
pub mod coords;
pub mod device;
pub mod input;
pub mod logging;
pub mod shell;
pub mod time;
pub mod window;

pub use crate::core::{App, AppControl, FrameCtx};
pub use crate::shell::{Shell, ShellConfig, ShellError};
pub use crate::window::WinitPlatform;
