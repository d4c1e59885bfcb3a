use crate::coords::{ColorRgba, Viewport};
use crate::input::{InputFrame, InputState};
use crate::shell::ShellWindow;
use crate::time::FrameTime;

/// Per-frame context passed to `App::on_frame`.
///
/// Everything is read-only except the clear color, which the shell applies
/// right after the callback returns.
pub struct FrameCtx<'a> {
    pub window: &'a ShellWindow,
    pub viewport: Viewport,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub clear_color: ColorRgba,
}

impl<'a> FrameCtx<'a> {
    pub fn set_clear_color(&mut self, color: ColorRgba) {
        self.clear_color = color;
    }

    /// Zero-based index of the current frame.
    pub fn frame_index(&self) -> u64 {
        self.time.frame_index
    }
}
