/// Lifecycle of the application shell.
///
/// Every transition is one-shot. `Running` repeats frames without changing
/// state; `ShuttingDown` is reachable from any state so teardown happens on
/// every exit path.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShellState {
    Uninitialized,
    Initialized,
    ContextCurrent,
    Running,
    ShuttingDown,
    Terminated,
}

impl ShellState {
    pub fn can_transition_to(self, next: ShellState) -> bool {
        use ShellState::*;
        matches!(
            (self, next),
            (Uninitialized, Initialized)
                | (Initialized, ContextCurrent)
                | (ContextCurrent, Running)
                | (Uninitialized | Initialized | ContextCurrent | Running, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }

    /// True once the graphics context is bound and usable.
    pub fn has_context(self) -> bool {
        matches!(self, ShellState::ContextCurrent | ShellState::Running)
    }

    pub fn is_terminal(self) -> bool {
        self == ShellState::Terminated
    }
}
