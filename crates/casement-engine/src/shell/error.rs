use super::state::ShellState;

/// Failures surfaced by the application shell.
///
/// The first three are the initialization taxonomy. None of them is
/// recoverable at this layer: there is nothing left to do without a window
/// and a bound context.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The host has no usable windowing subsystem (no display, wrong thread).
    #[error("windowing subsystem unavailable: {0}")]
    PlatformInit(String),

    /// The requested window or context configuration cannot be satisfied.
    #[error("cannot create window: {0}")]
    WindowCreation(String),

    /// The graphics device could not be brought up on the current context.
    #[error("graphics initialization failed: {0}")]
    GraphicsInit(String),

    #[error("invalid shell configuration: {0}")]
    InvalidConfig(String),

    /// An operation was called out of lifecycle order.
    #[error("`{op}` requires state {expected:?}, shell is {actual:?}")]
    InvalidState {
        op: &'static str,
        expected: ShellState,
        actual: ShellState,
    },

    /// The backend reported an unrecoverable present failure.
    #[error("present failed: {0}")]
    Present(String),
}

impl ShellError {
    /// True for the errors that can only happen while bringing the shell up.
    pub fn is_initialization(&self) -> bool {
        matches!(
            self,
            ShellError::PlatformInit(_)
                | ShellError::WindowCreation(_)
                | ShellError::GraphicsInit(_)
                | ShellError::InvalidConfig(_)
        )
    }
}
