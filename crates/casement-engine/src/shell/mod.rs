//! Application shell: window/context lifecycle and the frame loop.
//!
//! The shell talks to the host through the `Platform` trait. `WinitPlatform`
//! (in `crate::window`) opens a real window with a wgpu context;
//! `HeadlessPlatform` replays a script and records graphics calls.
//!
//! Lifecycle: `initialize` -> `make_current` -> `run_loop` -> `shutdown`.

mod config;
mod error;
pub mod headless;
mod lifecycle;
mod platform;
mod state;
mod window;

pub use config::{ApiVersion, GraphicsHints, Profile, ShellConfig, WindowConfig};
pub use error::ShellError;
pub use headless::HeadlessPlatform;
pub use lifecycle::{RunSummary, Shell};
pub use platform::{GraphicsContext, Platform, PlatformEvent, PresentStatus};
pub use state::ShellState;
pub use window::ShellWindow;
