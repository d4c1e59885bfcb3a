use std::panic;
use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::device::{Gpu, GpuInit, GpuSurface};
use crate::input::platform::winit::translate_window_event;
use crate::shell::{GraphicsContext, GraphicsHints, Platform, PlatformEvent, ShellError, WindowConfig};

/// Pumps allowed for the event loop to deliver `resumed` after a window request.
const MAX_RESUME_PUMPS: usize = 64;

/// Desktop platform: a winit window with a wgpu context.
///
/// The winit event loop is pumped without blocking once per frame instead of
/// owning the thread, so the shell keeps control of the loop.
pub struct WinitPlatform {
    gpu_init: GpuInit,
    event_loop: Option<EventLoop<()>>,
    handler: PumpHandler,

    /// Surface + adapter between window creation and make-current.
    pending: Option<GpuSurface>,
    gpu: Option<Gpu>,
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self::new(GpuInit::default())
    }
}

impl WinitPlatform {
    pub fn new(gpu_init: GpuInit) -> Self {
        Self {
            gpu_init,
            event_loop: None,
            handler: PumpHandler::default(),
            pending: None,
            gpu: None,
        }
    }

    /// The native window, once created.
    pub fn window(&self) -> Option<&Window> {
        self.handler.window.as_deref()
    }

    fn pump(&mut self) -> Option<i32> {
        let event_loop = self.event_loop.as_mut()?;
        match event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler) {
            PumpStatus::Continue => None,
            PumpStatus::Exit(code) => Some(code),
        }
    }
}

impl Platform for WinitPlatform {
    fn init(&mut self) -> Result<(), ShellError> {
        if self.event_loop.is_some() {
            return Ok(());
        }

        // Names are only a hint: any thread may be called "main". winit's own
        // main-thread assertion is the real check and it panics, so that panic
        // is turned into an error below.
        if std::thread::current().name() != Some("main") {
            return Err(ShellError::PlatformInit(
                "the window must be created and driven from the main thread".into(),
            ));
        }

        let event_loop = panic::catch_unwind(EventLoop::new)
            .map_err(|_| {
                ShellError::PlatformInit("winit refused to create an event loop on this thread".into())
            })?
            .map_err(|e| ShellError::PlatformInit(format!("failed to create winit EventLoop: {e}")))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        self.event_loop = Some(event_loop);
        Ok(())
    }

    fn create_window(
        &mut self,
        window: &WindowConfig,
        hints: &GraphicsHints,
        vsync: bool,
    ) -> Result<(u32, u32), ShellError> {
        if self.event_loop.is_none() {
            return Err(ShellError::WindowCreation("windowing subsystem not initialized".into()));
        }

        self.handler.requested = Some(
            Window::default_attributes()
                .with_title(window.title.clone())
                .with_inner_size(PhysicalSize::new(window.width, window.height)),
        );

        for _ in 0..MAX_RESUME_PUMPS {
            if let Some(code) = self.pump() {
                return Err(ShellError::WindowCreation(format!(
                    "event loop exited with code {code} before the window opened"
                )));
            }
            if let Some(err) = self.handler.create_error.take() {
                return Err(ShellError::WindowCreation(err));
            }
            if self.handler.window.is_some() {
                break;
            }
        }

        let native = self
            .handler
            .window
            .clone()
            .ok_or_else(|| ShellError::WindowCreation("event loop never resumed".into()))?;

        let gpu_init = GpuInit {
            present_mode: GpuInit::with_vsync(vsync).present_mode,
            ..self.gpu_init.clone()
        };
        self.pending = Some(GpuSurface::new(native.clone(), gpu_init, hints)?);

        let size = native.inner_size();
        Ok((size.width, size.height))
    }

    fn make_current(&mut self) -> Result<(), ShellError> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| ShellError::GraphicsInit("no window surface to bind".into()))?;
        let size = self
            .handler
            .window
            .as_ref()
            .map(|w| w.inner_size())
            .unwrap_or_default();

        let gpu = pending
            .bind(size)
            .map_err(|e| ShellError::GraphicsInit(format!("{e:#}")))?;
        self.gpu = Some(gpu);
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>) {
        if let Some(code) = self.pump() {
            log::debug!("winit event loop exited with code {code}");
            self.handler.events.push(PlatformEvent::CloseRequested);
        }
        out.append(&mut self.handler.events);
    }

    fn graphics(&mut self) -> Option<&mut dyn GraphicsContext> {
        self.gpu.as_mut().map(|gpu| gpu as &mut dyn GraphicsContext)
    }

    fn teardown(&mut self) {
        // Surface first: it holds a handle to the window.
        self.gpu = None;
        self.pending = None;
        self.handler.window = None;
        self.handler.requested = None;
        self.handler.events.clear();
        self.event_loop = None;
    }
}

impl Drop for WinitPlatform {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Receives winit callbacks while the loop is being pumped.
#[derive(Default)]
struct PumpHandler {
    requested: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    create_error: Option<String>,
    events: Vec<PlatformEvent>,
}

impl ApplicationHandler for PumpHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.requested.take() else {
            return;
        };

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(format!("failed to create window: {e}")),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.events.push(PlatformEvent::CloseRequested),

            WindowEvent::Resized(size) => self.events.push(PlatformEvent::FramebufferResized {
                width: size.width,
                height: size.height,
            }),

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = window.inner_size();
                self.events.push(PlatformEvent::FramebufferResized {
                    width: size.width,
                    height: size.height,
                });
            }

            _ => {
                if let Some(ev) = translate_window_event(&event) {
                    self.events.push(PlatformEvent::Input(ev));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_start_off_the_main_thread() {
        let result = std::thread::Builder::new()
            .name("worker".into())
            .spawn(|| WinitPlatform::default().init())
            .unwrap()
            .join()
            .unwrap();
        assert!(matches!(result, Err(ShellError::PlatformInit(_))));
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    #[test]
    fn thread_named_main_is_still_refused() {
        let result = std::thread::Builder::new()
            .name("main".into())
            .spawn(|| WinitPlatform::default().init())
            .unwrap()
            .join()
            .unwrap();
        assert!(matches!(result, Err(ShellError::PlatformInit(_))));
    }

    #[test]
    fn window_needs_an_initialized_platform() {
        let mut p = WinitPlatform::default();
        let err = p
            .create_window(&WindowConfig::default(), &GraphicsHints::default(), true)
            .unwrap_err();
        assert!(matches!(err, ShellError::WindowCreation(_)));
    }

    #[test]
    fn make_current_without_window_fails() {
        let mut p = WinitPlatform::default();
        assert!(matches!(p.make_current(), Err(ShellError::GraphicsInit(_))));
        assert!(p.graphics().is_none());
    }

    #[test]
    fn idle_platform_polls_nothing_and_tears_down_twice() {
        let mut p = WinitPlatform::default();
        let mut out = Vec::new();
        p.poll_events(&mut out);
        assert!(out.is_empty());
        p.teardown();
        p.teardown();
        assert!(p.window().is_none());
    }

    #[test]
    fn dropping_without_teardown_is_clean() {
        let mut p = WinitPlatform::default();
        let mut out = Vec::new();
        p.poll_events(&mut out);
        drop(p);
    }
}
