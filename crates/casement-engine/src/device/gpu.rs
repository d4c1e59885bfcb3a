use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::{ColorRgba, Viewport};
use crate::shell::{GraphicsContext, GraphicsHints, PresentStatus, ShellError};

use super::{hints, surface, GpuFrame, GpuInit};

/// Surface and adapter for a window whose context is not bound yet.
///
/// Created together with the window, so an adapter that cannot satisfy the
/// requested hints fails window creation.
pub struct GpuSurface {
    window: Arc<Window>,
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    init: GpuInit,
}

impl GpuSurface {
    /// Creates the surface for `window` and picks a compatible adapter.
    ///
    /// Adapter acquisition is asynchronous under wgpu; it is driven to
    /// completion on the calling thread.
    pub fn new(window: Arc<Window>, init: GpuInit, hints: &GraphicsHints) -> Result<Self, ShellError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ShellError::WindowCreation(format!("failed to create wgpu surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| ShellError::WindowCreation(format!("no suitable GPU adapter: {e}")))?;

        let info = adapter.get_info();
        hints::check_adapter(hints, &adapter.get_downlevel_capabilities(), &info.name)?;
        log::info!("using adapter `{}` ({:?} backend)", info.name, info.backend);

        Ok(Self {
            window,
            instance,
            surface,
            adapter,
            init,
        })
    }

    /// Creates the device and configures the surface at `size`.
    pub fn bind(self, size: PhysicalSize<u32>) -> Result<Gpu> {
        let GpuSurface {
            window,
            instance,
            surface,
            adapter,
            init,
        } = self;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("casement device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        }))
        .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface::choose_present_mode(&caps, init.present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }
        log::debug!(
            "surface configured: {:?} {}x{} {:?}",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        Ok(Gpu {
            window,
            _instance: instance,
            surface,
            _adapter: adapter,
            device,
            queue,
            config,
            size,
            viewport: Viewport::full(size.width, size.height),
            clear_color: ColorRgba::black(),
            frame: None,
            acquire_error: None,
        })
    }
}

/// Bound wgpu context: device, queue and the configured window surface.
///
/// Implements the clear/present half of the frame loop. A frame is acquired
/// by `clear_color_buffer` and handed to the compositor by `present`.
pub struct Gpu {
    window: Arc<Window>,
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    _adapter: wgpu::Adapter,

    device: wgpu::Device,
    queue: wgpu::Queue,

    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    viewport: Viewport,
    clear_color: ColorRgba,

    /// Frame acquired by the last clear, waiting for present.
    frame: Option<GpuFrame>,

    /// Why the last clear could not acquire a frame.
    acquire_error: Option<wgpu::SurfaceError>,
}

impl Gpu {
    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size == self.size {
            return;
        }
        surface::apply_resize(&self.surface, &self.device, &mut self.config, &mut self.size, new_size);
    }

    fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(GpuFrame { surface_texture, view })
    }

    fn encode_clear(&self, frame: &GpuFrame) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("casement clear encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("casement clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let vp = self.clipped_viewport();
            if !vp.is_empty() {
                rpass.set_viewport(
                    vp.x as f32,
                    vp.y as f32,
                    vp.width as f32,
                    vp.height as f32,
                    0.0,
                    1.0,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Viewport limited to the configured surface; wgpu rejects anything larger.
    fn clipped_viewport(&self) -> Viewport {
        let x = self.viewport.x.max(0) as u32;
        let y = self.viewport.y.max(0) as u32;
        let w = self.viewport.width.min(self.config.width.saturating_sub(x));
        let h = self.viewport.height.min(self.config.height.saturating_sub(y));
        Viewport::new(x as i32, y as i32, w, h)
    }
}

impl GraphicsContext for Gpu {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let wanted = PhysicalSize::new(
            viewport.x.max(0) as u32 + viewport.width,
            viewport.y.max(0) as u32 + viewport.height,
        );
        self.resize(wanted);
    }

    fn set_clear_color(&mut self, color: ColorRgba) {
        self.clear_color = color;
    }

    fn clear_color_buffer(&mut self) {
        // A frame left over from a clear without present is dropped unshown.
        self.frame = None;
        self.acquire_error = None;

        if self.size.width == 0 || self.size.height == 0 {
            return;
        }

        match self.begin_frame() {
            Ok(frame) => {
                self.encode_clear(&frame);
                self.frame = Some(frame);
            }
            Err(err) => self.acquire_error = Some(err),
        }
    }

    fn present(&mut self) -> PresentStatus {
        if let Some(frame) = self.frame.take() {
            drop(frame.view);
            self.window.pre_present_notify();
            frame.surface_texture.present();
            return PresentStatus::Presented;
        }

        let Some(err) = self.acquire_error.take() else {
            // Zero-sized surface: nothing to show until the window has area again.
            return PresentStatus::Skipped;
        };

        let action = surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, &err);
        log::warn!("surface frame unavailable ({err}), {action:?}");
        action.into_status(&err)
    }
}
