use anyhow::{Context, Result};
use clap::Parser;

use casement_engine::coords::ColorRgba;
use casement_engine::device::GpuInit;
use casement_engine::input::Key;
use casement_engine::logging::{init_logging, LoggingConfig};
use casement_engine::shell::{
    ApiVersion, GraphicsHints, HeadlessPlatform, Profile, ShellWindow, WindowConfig,
};
use casement_engine::{App, AppControl, FrameCtx, Shell, ShellConfig, WinitPlatform};

#[derive(Parser, Debug, Clone)]
#[command(name = "casement-window")]
#[command(about = "Opens a window and clears it every frame until the exit key is pressed", long_about = None)]
struct Cli {
    /// Window width in pixels
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    #[arg(long, default_value = "Learn OpenGL :: Window")]
    title: String,

    /// Graphics API version to request, MAJOR.MINOR
    #[arg(long = "gl-version", default_value = "3.3")]
    gl_version: ApiVersion,

    /// Context profile: any, core or compat
    #[arg(long, default_value = "core")]
    profile: Profile,

    /// Do not request a forward-compatible context
    #[arg(long = "no-forward-compat")]
    no_forward_compat: bool,

    /// Present without waiting for vertical blank
    #[arg(long = "no-vsync")]
    no_vsync: bool,

    /// Key that closes the window
    #[arg(long = "exit-key", default_value = "escape", value_parser = parse_key)]
    exit_key: Key,

    /// Run this many frames without a display, then exit
    #[arg(long = "headless-frames", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    headless_frames: Option<u64>,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long = "log", value_name = "FILTER")]
    log: Option<String>,
}

impl Cli {
    fn shell_config(&self) -> ShellConfig {
        ShellConfig {
            window: WindowConfig {
                width: self.width,
                height: self.height,
                title: self.title.clone(),
            },
            hints: GraphicsHints {
                version: self.gl_version,
                profile: self.profile,
                forward_compatible: !self.no_forward_compat,
            },
            clear_color: ColorRgba::teal(),
            exit_key: self.exit_key,
            vsync: !self.no_vsync,
        }
    }
}

fn parse_key(s: &str) -> Result<Key, String> {
    Key::from_name(s).ok_or_else(|| format!("unknown key `{s}`"))
}

/// Nothing to draw beyond the clear; reports the frame rate at debug level.
#[derive(Default)]
struct WindowApp {
    elapsed: f32,
    frames: u32,
}

impl App for WindowApp {
    fn on_start(&mut self, window: &ShellWindow) {
        let (w, h) = window.size();
        log::info!("rendering \"{}\" at {w}x{h}", window.title());
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self.elapsed += ctx.time.dt;
        self.frames += 1;

        if self.elapsed >= 1.0 {
            log::debug!(
                "{:.1} fps, viewport {}",
                self.frames as f32 / self.elapsed,
                ctx.viewport
            );
            self.elapsed = 0.0;
            self.frames = 0;
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let config = cli.shell_config();
    let mut app = WindowApp::default();

    let summary = match cli.headless_frames {
        Some(frames) => Shell::run(HeadlessPlatform::new().close_after_polls(frames), config, &mut app),
        None => Shell::run(WinitPlatform::new(GpuInit::default()), config, &mut app),
    }
    .context("window shell failed")?;

    log::info!(
        "closed after {} frames, final viewport {}",
        summary.frames,
        summary.viewport
    );
    Ok(())
}
