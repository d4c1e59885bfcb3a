//! Scripted platform with no display.
//!
//! Each poll hands out the next scripted batch of events. Graphics calls are
//! recorded instead of executed, so a run can be checked call by call.

use std::cell::Cell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use crate::coords::{ColorRgba, Viewport};

use super::config::{ApiVersion, GraphicsHints, Profile, WindowConfig};
use super::platform::{GraphicsContext, Platform, PlatformEvent, PresentStatus};
use super::ShellError;

/// One recorded graphics call.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicsCall {
    SetViewport(Viewport),
    SetClearColor(ColorRgba),
    Clear,
    Present,
}

/// Context that records what it is asked to do.
#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: Vec<GraphicsCall>,
    viewport: Viewport,
    present_script: VecDeque<PresentStatus>,
}

impl RecordingContext {
    pub fn calls(&self) -> &[GraphicsCall] {
        &self.calls
    }
}

impl GraphicsContext for RecordingContext {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.calls.push(GraphicsCall::SetViewport(viewport));
    }

    fn set_clear_color(&mut self, color: ColorRgba) {
        self.calls.push(GraphicsCall::SetClearColor(color));
    }

    fn clear_color_buffer(&mut self) {
        self.calls.push(GraphicsCall::Clear);
    }

    fn present(&mut self) -> PresentStatus {
        self.calls.push(GraphicsCall::Present);
        if let Some(status) = self.present_script.pop_front() {
            return status;
        }
        if self.viewport.is_empty() {
            PresentStatus::Skipped
        } else {
            PresentStatus::Presented
        }
    }
}

/// Failure to inject at one of the bring-up steps.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FailAt {
    Init,
    CreateWindow,
    MakeCurrent,
}

/// Platform driven entirely by a script.
#[derive(Debug)]
pub struct HeadlessPlatform {
    script: VecDeque<Vec<PlatformEvent>>,
    close_after_polls: Option<u64>,
    fail_at: Option<FailAt>,
    max_version: ApiVersion,
    unsupported_profiles: HashSet<Profile>,
    pending_present: VecDeque<PresentStatus>,
    framebuffer: Option<(u32, u32)>,

    polls: u64,
    up: bool,
    window: Option<WindowConfig>,
    context: Option<RecordingContext>,
    torn_down: bool,

    /// Teardowns so far, shared with whoever asked via `teardown_counter`.
    teardowns: Rc<Cell<u32>>,

    /// Calls recorded by the context, kept after teardown.
    history: Vec<GraphicsCall>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            close_after_polls: None,
            fail_at: None,
            max_version: ApiVersion::new(4, 6),
            unsupported_profiles: HashSet::new(),
            pending_present: VecDeque::new(),
            framebuffer: None,
            polls: 0,
            up: false,
            window: None,
            context: None,
            torn_down: false,
            teardowns: Rc::new(Cell::new(0)),
            history: Vec::new(),
        }
    }

    /// Events delivered on consecutive polls; polls past the end deliver nothing.
    pub fn with_script(mut self, batches: impl IntoIterator<Item = Vec<PlatformEvent>>) -> Self {
        self.script = batches.into_iter().collect();
        self
    }

    /// Delivers `CloseRequested` from poll number `n` (1-based) on.
    ///
    /// `n == 0` closes on the first poll.
    pub fn close_after_polls(mut self, n: u64) -> Self {
        self.close_after_polls = Some(n);
        self
    }

    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Highest context version this fake driver can create.
    pub fn with_max_version(mut self, version: ApiVersion) -> Self {
        self.max_version = version;
        self
    }

    pub fn without_profile(mut self, profile: Profile) -> Self {
        self.unsupported_profiles.insert(profile);
        self
    }

    /// Statuses returned by the first presents, in order.
    pub fn with_present_results(mut self, results: impl IntoIterator<Item = PresentStatus>) -> Self {
        self.pending_present = results.into_iter().collect();
        self
    }

    /// Framebuffer size the fake window manager grants instead of the
    /// requested one.
    pub fn with_framebuffer_size(mut self, width: u32, height: u32) -> Self {
        self.framebuffer = Some((width, height));
        self
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Number of `teardown` calls, readable after the platform has been
    /// moved into a shell or dropped with it.
    pub fn teardown_counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.teardowns)
    }

    pub fn window_config(&self) -> Option<&WindowConfig> {
        self.window.as_ref()
    }

    /// Every graphics call made so far, including those before teardown.
    pub fn calls(&self) -> Vec<GraphicsCall> {
        let mut calls = self.history.clone();
        if let Some(ctx) = self.context.as_ref() {
            calls.extend_from_slice(ctx.calls());
        }
        calls
    }

    /// Number of completed presents.
    pub fn presents(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, GraphicsCall::Present))
            .count()
    }

    fn fail(&self, step: FailAt) -> bool {
        self.fail_at == Some(step)
    }
}

impl Platform for HeadlessPlatform {
    fn init(&mut self) -> Result<(), ShellError> {
        if self.fail(FailAt::Init) {
            return Err(ShellError::PlatformInit("no display available".into()));
        }
        self.up = true;
        self.torn_down = false;
        Ok(())
    }

    fn create_window(
        &mut self,
        window: &WindowConfig,
        hints: &GraphicsHints,
        _vsync: bool,
    ) -> Result<(u32, u32), ShellError> {
        if !self.up {
            return Err(ShellError::WindowCreation("windowing subsystem not initialized".into()));
        }
        if self.fail(FailAt::CreateWindow) {
            return Err(ShellError::WindowCreation("driver refused the window".into()));
        }
        hints.validate()?;
        if hints.version > self.max_version {
            return Err(ShellError::WindowCreation(format!(
                "version {} requested, driver supports up to {}",
                hints.version, self.max_version
            )));
        }
        if self.unsupported_profiles.contains(&hints.profile) {
            return Err(ShellError::WindowCreation(format!(
                "{:?} profile not supported by driver",
                hints.profile
            )));
        }

        self.window = Some(window.clone());
        Ok(self.framebuffer.unwrap_or((window.width, window.height)))
    }

    fn make_current(&mut self) -> Result<(), ShellError> {
        if self.window.is_none() {
            return Err(ShellError::GraphicsInit("no window to bind".into()));
        }
        if self.fail(FailAt::MakeCurrent) {
            return Err(ShellError::GraphicsInit("function table failed to load".into()));
        }
        self.context = Some(RecordingContext {
            present_script: std::mem::take(&mut self.pending_present),
            ..RecordingContext::default()
        });
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>) {
        self.polls += 1;
        if let Some(batch) = self.script.pop_front() {
            out.extend(batch);
        }
        if self
            .close_after_polls
            .is_some_and(|n| n == 0 || self.polls >= n)
        {
            out.push(PlatformEvent::CloseRequested);
        }
    }

    fn graphics(&mut self) -> Option<&mut dyn GraphicsContext> {
        self.context
            .as_mut()
            .map(|ctx| ctx as &mut dyn GraphicsContext)
    }

    fn teardown(&mut self) {
        if let Some(ctx) = self.context.take() {
            self.history.extend(ctx.calls);
        }
        self.window = None;
        self.up = false;
        self.torn_down = true;
        self.teardowns.set(self.teardowns.get() + 1);
    }
}
