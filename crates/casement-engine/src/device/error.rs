use crate::shell::PresentStatus;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM).
    Fatal,
}

impl SurfaceErrorAction {
    pub(crate) fn into_status(self, err: &wgpu::SurfaceError) -> PresentStatus {
        match self {
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => PresentStatus::Skipped,
            SurfaceErrorAction::Fatal => PresentStatus::Fatal(err.to_string()),
        }
    }
}
