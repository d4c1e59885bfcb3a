use std::marker::PhantomData;

use crate::coords::{ColorRgba, Viewport};
use crate::core::{App, AppControl, FrameCtx};
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

use super::config::ShellConfig;
use super::platform::{Platform, PlatformEvent, PresentStatus};
use super::state::ShellState;
use super::window::ShellWindow;
use super::ShellError;

/// What a finished frame loop did.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Frames that ran the full poll/check/render/clear/present sequence.
    pub frames: u64,

    /// Frames whose present showed nothing.
    pub skipped_presents: u64,

    /// Viewport in effect when the loop ended.
    pub viewport: Viewport,
}

/// Owns the window/context lifecycle and drives the frame loop.
///
/// The shell is pinned to the thread that created it: windowing and graphics
/// contexts are thread-affine, so the type is neither `Send` nor `Sync`.
/// Dropping the shell runs `shutdown`, so resources are released on every
/// exit path including unwinding.
pub struct Shell<P: Platform> {
    platform: P,
    config: ShellConfig,
    state: ShellState,

    window: Option<ShellWindow>,
    viewport: Viewport,
    clear_color: ColorRgba,

    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    /// Reused poll buffer.
    events: Vec<PlatformEvent>,

    _thread_affine: PhantomData<*const ()>,
}

impl<P: Platform> Shell<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            config: ShellConfig::default(),
            state: ShellState::Uninitialized,
            window: None,
            viewport: Viewport::default(),
            clear_color: ColorRgba::teal(),
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            events: Vec::new(),
            _thread_affine: PhantomData,
        }
    }

    /// Initializes, binds, runs `app` until close, then shuts down.
    pub fn run<A: App>(platform: P, config: ShellConfig, app: &mut A) -> Result<RunSummary, ShellError> {
        let mut shell = Shell::new(platform);
        shell.initialize(config)?;
        shell.make_current()?;
        let summary = shell.run_loop(app);
        shell.shutdown();
        summary
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn window(&self) -> Option<&ShellWindow> {
        self.window.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Brings up the windowing subsystem and creates the window.
    ///
    /// On error the shell never leaves `Uninitialized`; whatever the platform
    /// managed to create is released by `shutdown`.
    pub fn initialize(&mut self, config: ShellConfig) -> Result<&ShellWindow, ShellError> {
        self.expect_state("initialize", ShellState::Uninitialized)?;
        config.validate()?;

        self.platform.init()?;
        log::debug!("windowing subsystem up");

        let (width, height) =
            self.platform
                .create_window(&config.window, &config.hints, config.vsync)?;

        log::info!(
            "created window \"{}\" {}x{} (requested {}x{}, {:?} {} context)",
            config.window.title,
            width,
            height,
            config.window.width,
            config.window.height,
            config.hints.profile,
            config.hints.version,
        );

        self.window = Some(ShellWindow::new(config.window.title.clone(), width, height));
        self.clear_color = config.clear_color;
        self.config = config;
        self.transition(ShellState::Initialized);

        self.window
            .as_ref()
            .ok_or_else(|| ShellError::WindowCreation("window vanished after creation".into()))
    }

    /// Binds the context to this thread and sets the first viewport.
    ///
    /// The viewport covers the framebuffer the platform actually created,
    /// which can differ from the requested size. Allowed exactly once, right
    /// after `initialize`.
    pub fn make_current(&mut self) -> Result<(), ShellError> {
        self.expect_state("make_current", ShellState::Initialized)?;

        self.platform.make_current()?;
        self.transition(ShellState::ContextCurrent);

        let (width, height) = self
            .window
            .as_ref()
            .map_or((self.config.window.width, self.config.window.height), ShellWindow::size);
        let viewport = Viewport::full(width, height);
        self.apply_viewport(viewport);
        Ok(())
    }

    /// Framebuffer-size callback: viewport becomes `(0, 0, width, height)`.
    ///
    /// Applied synchronously, so the next clear/present already uses it.
    /// Repeating the same size changes nothing.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(window) = self.window.as_mut() {
            window.set_size(width, height);
        }
        let viewport = Viewport::full(width, height);
        if viewport == self.viewport {
            log::trace!("resize to current viewport {viewport} ignored");
            return;
        }
        log::debug!("framebuffer resized to {width}x{height}");
        self.apply_viewport(viewport);
    }

    /// Closes the window if the exit key is held right now.
    ///
    /// Level-triggered: a held key is seen on every poll.
    pub fn check_exit_input(&mut self) {
        if !self.input.key_down(self.config.exit_key) {
            return;
        }
        if let Some(window) = self.window.as_mut() {
            if !window.should_close() {
                log::info!("{} pressed, closing", self.config.exit_key);
            }
            window.request_close();
        }
    }

    /// Runs frames until the window is flagged for closing.
    ///
    /// Each frame: poll events, check the exit key, call `app`, set the clear
    /// color, clear, present. A frame always completes once it has started.
    pub fn run_loop<A: App>(&mut self, app: &mut A) -> Result<RunSummary, ShellError> {
        self.expect_state("run_loop", ShellState::ContextCurrent)?;
        self.transition(ShellState::Running);

        if let Some(window) = self.window.as_ref() {
            app.on_start(window);
        }

        let mut summary = RunSummary::default();
        let mut fatal: Option<String> = None;
        self.clock.reset();

        while !self.should_close() {
            self.process_events();
            self.check_exit_input();

            let Some(window) = self.window.as_mut() else {
                break;
            };

            let mut ctx = FrameCtx {
                window: &*window,
                viewport: self.viewport,
                input: &self.input,
                input_frame: &self.input_frame,
                time: self.clock.tick(),
                clear_color: self.clear_color,
            };
            let control = app.on_frame(&mut ctx);
            self.clear_color = ctx.clear_color;

            if control == AppControl::Exit {
                window.request_close();
            }

            let Some(gfx) = self.platform.graphics() else {
                return Err(ShellError::Present("graphics context lost during frame".into()));
            };
            gfx.set_clear_color(self.clear_color);
            gfx.clear_color_buffer();
            match gfx.present() {
                PresentStatus::Presented => {}
                PresentStatus::Skipped => {
                    log::trace!("frame {} not presented", summary.frames);
                    summary.skipped_presents += 1;
                }
                PresentStatus::Fatal(msg) => {
                    log::error!("present failed, closing: {msg}");
                    window.request_close();
                    fatal = Some(msg);
                }
            }

            self.input_frame.clear();
            summary.frames += 1;
        }

        summary.viewport = self.viewport;
        log::info!(
            "frame loop finished after {} frames ({} not presented)",
            summary.frames,
            summary.skipped_presents
        );

        match fatal {
            Some(msg) => Err(ShellError::Present(msg)),
            None => Ok(summary),
        }
    }

    /// Releases context, window and windowing subsystem. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.transition(ShellState::ShuttingDown);
        self.platform.teardown();
        self.window = None;
        self.transition(ShellState::Terminated);
        log::debug!("shell terminated");
    }

    fn should_close(&self) -> bool {
        self.window.as_ref().is_none_or(ShellWindow::should_close)
    }

    fn process_events(&mut self) {
        let mut events = std::mem::take(&mut self.events);
        self.platform.poll_events(&mut events);

        for ev in events.drain(..) {
            match ev {
                PlatformEvent::FramebufferResized { width, height } => self.on_resize(width, height),
                PlatformEvent::CloseRequested => {
                    if let Some(window) = self.window.as_mut() {
                        window.request_close();
                    }
                }
                PlatformEvent::Input(ev) => self.input.apply_event(&mut self.input_frame, ev),
            }
        }

        self.events = events;
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.state.has_context() {
            return;
        }
        if let Some(gfx) = self.platform.graphics() {
            gfx.set_viewport(viewport);
        }
    }

    fn expect_state(&self, op: &'static str, expected: ShellState) -> Result<(), ShellError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ShellError::InvalidState {
                op,
                expected,
                actual: self.state,
            })
        }
    }

    fn transition(&mut self, next: ShellState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal shell transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("shell state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<P: Platform> Drop for Shell<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
