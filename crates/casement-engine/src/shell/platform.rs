use crate::coords::{ColorRgba, Viewport};
use crate::input::InputEvent;

use super::config::{GraphicsHints, WindowConfig};
use super::ShellError;

/// Event drained from the platform during the poll step of a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Framebuffer size changed, in physical pixels.
    FramebufferResized { width: u32, height: u32 },

    /// The window manager asked the window to close.
    CloseRequested,

    Input(InputEvent),
}

/// Outcome of presenting one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentStatus {
    Presented,

    /// Nothing was shown this frame (zero-sized or reconfigured surface,
    /// acquire timeout). The loop keeps going.
    Skipped,

    /// The backend cannot present anymore.
    Fatal(String),
}

/// Drawing surface of the window, valid once the context is current.
///
/// State-setting calls (`set_viewport`, `set_clear_color`) affect the
/// state-using calls that follow them on the same context.
pub trait GraphicsContext {
    /// Maps output to `viewport` and resizes the backing surface when needed.
    fn set_viewport(&mut self, viewport: Viewport);

    fn set_clear_color(&mut self, color: ColorRgba);

    /// Fills the color buffer with the current clear color.
    fn clear_color_buffer(&mut self);

    /// Makes the frame visible. Blocks until the swap has been queued.
    fn present(&mut self) -> PresentStatus;
}

/// Windowing + graphics backend the shell drives.
///
/// Every method is called from the one thread that owns the shell.
pub trait Platform {
    /// Brings up the windowing subsystem.
    fn init(&mut self) -> Result<(), ShellError>;

    /// Creates the window and a context satisfying `hints`, not yet current.
    ///
    /// Returns the framebuffer size in physical pixels.
    fn create_window(
        &mut self,
        window: &WindowConfig,
        hints: &GraphicsHints,
        vsync: bool,
    ) -> Result<(u32, u32), ShellError>;

    /// Binds the context to the calling thread and loads the graphics device.
    fn make_current(&mut self) -> Result<(), ShellError>;

    /// Dispatches pending events into `out` and returns without waiting.
    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>);

    /// The bound context, `None` before `make_current` or after teardown.
    fn graphics(&mut self) -> Option<&mut dyn GraphicsContext>;

    /// Releases the context, the window and the windowing subsystem.
    ///
    /// Must be safe to call in any state and more than once.
    fn teardown(&mut self);
}
