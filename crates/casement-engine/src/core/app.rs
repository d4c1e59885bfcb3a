use crate::shell::ShellWindow;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Per-frame work driven by the shell.
///
/// Closures `FnMut(&mut FrameCtx<'_>) -> AppControl` implement this directly.
pub trait App {
    /// Called once, after the context is current and before the first frame.
    fn on_start(&mut self, window: &ShellWindow) {
        let _ = window;
    }

    /// Called once per frame, between the input check and the clear.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}

impl<F> App for F
where
    F: FnMut(&mut FrameCtx<'_>) -> AppControl,
{
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self(ctx)
    }
}
