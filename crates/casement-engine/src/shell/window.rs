/// The shell's view of its native window.
///
/// Holds the attributes the frame loop reads. The close flag only ever goes
/// from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellWindow {
    title: String,
    width: u32,
    height: u32,
    should_close: bool,
}

impl ShellWindow {
    pub(crate) fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            should_close: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Latest known framebuffer size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Flags the window for closing. There is no way to clear the flag.
    pub fn request_close(&mut self) {
        if !self.should_close {
            log::debug!("close requested for window \"{}\"", self.title);
        }
        self.should_close = true;
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
