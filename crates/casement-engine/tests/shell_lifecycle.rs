use std::panic::{self, AssertUnwindSafe};

use casement_engine::coords::{ColorRgba, Viewport};
use casement_engine::input::{InputEvent, Key};
use casement_engine::shell::headless::{FailAt, GraphicsCall};
use casement_engine::shell::{
    ApiVersion, GraphicsHints, HeadlessPlatform, PlatformEvent, PresentStatus, Profile, Shell,
    ShellConfig, ShellError, ShellState,
};
use casement_engine::{AppControl, FrameCtx};

fn learn_opengl() -> ShellConfig {
    ShellConfig::new(800, 600, "Learn OpenGL :: Window")
}

fn press(key: Key) -> Vec<PlatformEvent> {
    vec![PlatformEvent::Input(InputEvent::key_pressed(key))]
}

fn idle() -> Vec<PlatformEvent> {
    Vec::new()
}

fn ready(platform: HeadlessPlatform, config: ShellConfig) -> Shell<HeadlessPlatform> {
    let mut shell = Shell::new(platform);
    shell.initialize(config).unwrap();
    shell.make_current().unwrap();
    shell
}

/// Splits recorded calls into frames, each ending at a `Present`.
fn frames(calls: &[GraphicsCall]) -> Vec<Vec<GraphicsCall>> {
    let mut out = Vec::new();
    let mut cur = Vec::new();
    for call in calls {
        cur.push(call.clone());
        if *call == GraphicsCall::Present {
            out.push(std::mem::take(&mut cur));
        }
    }
    out
}

fn continue_frame(_: &mut FrameCtx<'_>) -> AppControl {
    AppControl::Continue
}

// ── bring-up ──────────────────────────────────────────────────────────────

#[test]
fn make_current_sets_full_viewport() {
    for (w, h) in [(1, 1), (800, 600), (1920, 1080), (3, 4096)] {
        let shell = ready(HeadlessPlatform::new(), ShellConfig::new(w, h, "t"));
        assert_eq!(shell.state(), ShellState::ContextCurrent);
        assert_eq!(shell.viewport(), Viewport::new(0, 0, w, h));
        assert_eq!(
            shell.platform().calls(),
            vec![GraphicsCall::SetViewport(Viewport::full(w, h))]
        );
    }
}

#[test]
fn first_viewport_follows_granted_framebuffer() {
    let platform = HeadlessPlatform::new().with_framebuffer_size(1600, 1200);
    let shell = ready(platform, learn_opengl());

    assert_eq!(shell.viewport(), Viewport::full(1600, 1200));
    assert_eq!(shell.window().unwrap().size(), (1600, 1200));
    assert_eq!(
        shell.platform().calls(),
        vec![GraphicsCall::SetViewport(Viewport::full(1600, 1200))]
    );
}

#[test]
fn initialize_returns_window_with_requested_attributes() {
    let mut shell = Shell::new(HeadlessPlatform::new());
    let window = shell.initialize(learn_opengl()).unwrap();
    assert_eq!(window.title(), "Learn OpenGL :: Window");
    assert_eq!(window.size(), (800, 600));
    assert!(!window.should_close());
    assert_eq!(shell.state(), ShellState::Initialized);
}

#[test]
fn unsupported_profile_fails_window_creation() {
    let platform = HeadlessPlatform::new().without_profile(Profile::Compatibility);
    let hints = GraphicsHints {
        profile: Profile::Compatibility,
        ..GraphicsHints::default()
    };
    let mut shell = Shell::new(platform);

    let err = shell.initialize(learn_opengl().with_hints(hints)).unwrap_err();
    assert!(matches!(err, ShellError::WindowCreation(_)), "{err}");
    assert_eq!(shell.state(), ShellState::Uninitialized);

    let err = shell.make_current().unwrap_err();
    assert!(matches!(err, ShellError::InvalidState { .. }));
    assert_ne!(shell.state(), ShellState::ContextCurrent);
}

#[test]
fn profile_below_3_2_fails_window_creation() {
    let hints = GraphicsHints {
        version: ApiVersion::new(2, 1),
        profile: Profile::Core,
        forward_compatible: false,
    };
    let mut shell = Shell::new(HeadlessPlatform::new());
    let err = shell.initialize(learn_opengl().with_hints(hints)).unwrap_err();
    assert!(matches!(err, ShellError::WindowCreation(_)));
}

#[test]
fn version_above_driver_fails_window_creation() {
    let platform = HeadlessPlatform::new().with_max_version(ApiVersion::new(3, 3));
    let hints = GraphicsHints {
        version: ApiVersion::new(4, 5),
        ..GraphicsHints::default()
    };
    let mut shell = Shell::new(platform);
    let err = shell.initialize(learn_opengl().with_hints(hints)).unwrap_err();
    assert!(matches!(err, ShellError::WindowCreation(_)));
}

#[test]
fn missing_windowing_subsystem_is_platform_init_error() {
    let mut shell = Shell::new(HeadlessPlatform::new().failing_at(FailAt::Init));
    let err = shell.initialize(learn_opengl()).unwrap_err();
    assert!(matches!(err, ShellError::PlatformInit(_)));
    assert!(err.is_initialization());
}

#[test]
fn device_load_failure_is_graphics_init_error() {
    let mut shell = Shell::new(HeadlessPlatform::new().failing_at(FailAt::MakeCurrent));
    shell.initialize(learn_opengl()).unwrap();
    let err = shell.make_current().unwrap_err();
    assert!(matches!(err, ShellError::GraphicsInit(_)));
    assert_eq!(shell.state(), ShellState::Initialized);
}

#[test]
fn zero_sized_window_is_rejected_before_platform_init() {
    let mut shell = Shell::new(HeadlessPlatform::new());
    let err = shell.initialize(ShellConfig::new(800, 0, "t")).unwrap_err();
    assert!(matches!(err, ShellError::InvalidConfig(_)));
}

#[test]
fn make_current_twice_is_rejected() {
    let mut shell = ready(HeadlessPlatform::new(), learn_opengl());
    let err = shell.make_current().unwrap_err();
    assert!(matches!(
        err,
        ShellError::InvalidState { op: "make_current", actual: ShellState::ContextCurrent, .. }
    ));
}

#[test]
fn run_loop_before_make_current_is_rejected() {
    let mut shell = Shell::new(HeadlessPlatform::new());
    shell.initialize(learn_opengl()).unwrap();
    let err = shell.run_loop(&mut continue_frame).unwrap_err();
    assert!(matches!(err, ShellError::InvalidState { op: "run_loop", .. }));
}

// ── resize ────────────────────────────────────────────────────────────────

#[test]
fn on_resize_is_idempotent() {
    let mut once = ready(HeadlessPlatform::new(), learn_opengl());
    once.on_resize(1024, 768);

    let mut twice = ready(HeadlessPlatform::new(), learn_opengl());
    twice.on_resize(1024, 768);
    twice.on_resize(1024, 768);

    assert_eq!(once.viewport(), twice.viewport());
    assert_eq!(twice.viewport(), Viewport::full(1024, 768));
    assert_eq!(once.platform().calls(), twice.platform().calls());
    assert_eq!(twice.window().unwrap().size(), (1024, 768));
}

#[test]
fn resize_mid_run_applies_before_next_clear() {
    let platform = HeadlessPlatform::new()
        .with_script([idle(), idle(), vec![PlatformEvent::FramebufferResized { width: 1024, height: 768 }]])
        .close_after_polls(4);
    let mut shell = ready(platform, learn_opengl());

    let mut seen = Vec::new();
    let summary = shell
        .run_loop(&mut |ctx: &mut FrameCtx<'_>| {
            seen.push(ctx.viewport);
            AppControl::Continue
        })
        .unwrap();

    assert_eq!(summary.frames, 4);
    assert_eq!(summary.viewport, Viewport::full(1024, 768));
    assert_eq!(
        seen,
        vec![
            Viewport::full(800, 600),
            Viewport::full(800, 600),
            Viewport::full(1024, 768),
            Viewport::full(1024, 768),
        ]
    );

    let calls = shell.platform().calls();
    let per_frame = frames(&calls[1..]);
    assert_eq!(per_frame[2][0], GraphicsCall::SetViewport(Viewport::full(1024, 768)));
    assert_eq!(
        &per_frame[2][1..],
        &[
            GraphicsCall::SetClearColor(ColorRgba::teal()),
            GraphicsCall::Clear,
            GraphicsCall::Present,
        ]
    );
}

#[test]
fn minimized_window_skips_presents_and_keeps_running() {
    let platform = HeadlessPlatform::new()
        .with_script([
            vec![PlatformEvent::FramebufferResized { width: 0, height: 0 }],
            idle(),
            vec![PlatformEvent::FramebufferResized { width: 800, height: 600 }],
        ])
        .close_after_polls(3);
    let mut shell = ready(platform, learn_opengl());

    let summary = shell.run_loop(&mut continue_frame).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.skipped_presents, 2);
    assert_eq!(summary.viewport, Viewport::full(800, 600));
}

// ── frame loop ────────────────────────────────────────────────────────────

#[test]
fn ten_idle_frames_with_scripted_close() {
    let platform = HeadlessPlatform::new().close_after_polls(10);
    let mut shell = ready(platform, learn_opengl());

    let mut iterations = 0;
    let summary = shell
        .run_loop(&mut |_: &mut FrameCtx<'_>| {
            iterations += 1;
            AppControl::Continue
        })
        .unwrap();

    assert_eq!(iterations, 10);
    assert_eq!(summary.frames, 10);
    assert_eq!(shell.platform().polls(), 10);
    assert_eq!(shell.viewport(), Viewport::full(800, 600));

    let calls = shell.platform().calls();
    assert_eq!(calls[0], GraphicsCall::SetViewport(Viewport::full(800, 600)));
    let per_frame = frames(&calls[1..]);
    assert_eq!(per_frame.len(), 10);
    for frame in per_frame {
        assert_eq!(
            frame,
            vec![
                GraphicsCall::SetClearColor(ColorRgba::new(0.2, 0.3, 0.3, 1.0)),
                GraphicsCall::Clear,
                GraphicsCall::Present,
            ]
        );
    }
}

#[test]
fn escape_on_frame_five_finishes_that_frame_only() {
    let platform = HeadlessPlatform::new().with_script([idle(), idle(), idle(), idle(), press(Key::Escape)]);
    let mut shell = ready(platform, learn_opengl());

    let mut rendered = Vec::new();
    let summary = shell
        .run_loop(&mut |ctx: &mut FrameCtx<'_>| {
            rendered.push((ctx.frame_index(), ctx.window.should_close()));
            AppControl::Continue
        })
        .unwrap();

    assert_eq!(summary.frames, 5);
    assert_eq!(shell.platform().presents(), 5);
    assert_eq!(rendered.last(), Some(&(4, true)));
    assert!(rendered[..4].iter().all(|(_, closing)| !closing));
    assert!(shell.window().unwrap().should_close());
}

#[test]
fn held_exit_key_is_observed_without_new_events() {
    let platform = HeadlessPlatform::new().with_script([press(Key::Escape)]);
    let mut shell = ready(platform, learn_opengl());

    let summary = shell.run_loop(&mut continue_frame).unwrap();
    assert_eq!(summary.frames, 1);

    // The key is still held; polling again would see it again.
    shell.check_exit_input();
    assert!(shell.window().unwrap().should_close());
}

#[test]
fn custom_exit_key_replaces_escape() {
    let platform = HeadlessPlatform::new()
        .with_script([press(Key::Escape), idle(), press(Key::Q)])
        .close_after_polls(10);
    let mut shell = ready(platform, learn_opengl().with_exit_key(Key::Q));

    let summary = shell.run_loop(&mut continue_frame).unwrap();
    assert_eq!(summary.frames, 3);
}

#[test]
fn close_flag_never_reverts() {
    let platform = HeadlessPlatform::new().with_script([
        idle(),
        vec![PlatformEvent::CloseRequested],
        vec![PlatformEvent::Input(InputEvent::key_released(Key::Escape))],
    ]);
    let mut shell = ready(platform, learn_opengl());

    let summary = shell.run_loop(&mut continue_frame).unwrap();
    assert_eq!(summary.frames, 2);
    assert_eq!(shell.platform().polls(), 2);
    assert!(shell.window().unwrap().should_close());
}

#[test]
fn frame_callback_can_request_exit() {
    let platform = HeadlessPlatform::new().close_after_polls(100);
    let mut shell = ready(platform, learn_opengl());

    let summary = shell
        .run_loop(&mut |ctx: &mut FrameCtx<'_>| {
            if ctx.frame_index() == 2 {
                AppControl::Exit
            } else {
                AppControl::Continue
            }
        })
        .unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(shell.platform().presents(), 3);
}

#[test]
fn frame_callback_can_change_clear_color() {
    let platform = HeadlessPlatform::new().close_after_polls(2);
    let mut shell = ready(platform, learn_opengl());
    let red = ColorRgba::new(1.0, 0.0, 0.0, 1.0);

    shell
        .run_loop(&mut |ctx: &mut FrameCtx<'_>| {
            if ctx.frame_index() == 1 {
                ctx.set_clear_color(red);
            }
            AppControl::Continue
        })
        .unwrap();

    let calls = shell.platform().calls();
    let per_frame = frames(&calls[1..]);
    assert_eq!(per_frame[0][0], GraphicsCall::SetClearColor(ColorRgba::teal()));
    assert_eq!(per_frame[1][0], GraphicsCall::SetClearColor(red));
}

#[test]
fn transient_present_failure_is_skipped() {
    let platform = HeadlessPlatform::new()
        .with_present_results([PresentStatus::Skipped, PresentStatus::Presented])
        .close_after_polls(3);
    let mut shell = ready(platform, learn_opengl());

    let summary = shell.run_loop(&mut continue_frame).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.skipped_presents, 1);
}

#[test]
fn fatal_present_ends_loop_with_error() {
    let platform = HeadlessPlatform::new()
        .with_present_results([PresentStatus::Presented, PresentStatus::Fatal("device lost".into())])
        .close_after_polls(10);
    let mut shell = ready(platform, learn_opengl());

    let err = shell.run_loop(&mut continue_frame).unwrap_err();
    assert!(matches!(err, ShellError::Present(ref msg) if msg == "device lost"));
    assert_eq!(shell.platform().polls(), 2);
    assert!(shell.window().unwrap().should_close());
}

#[test]
fn run_loop_is_one_shot() {
    let platform = HeadlessPlatform::new().close_after_polls(1);
    let mut shell = ready(platform, learn_opengl());
    shell.run_loop(&mut continue_frame).unwrap();
    let err = shell.run_loop(&mut continue_frame).unwrap_err();
    assert!(matches!(err, ShellError::InvalidState { actual: ShellState::Running, .. }));
}

// ── teardown ──────────────────────────────────────────────────────────────

#[test]
fn shutdown_after_loop_terminates() {
    let platform = HeadlessPlatform::new().close_after_polls(1);
    let mut shell = ready(platform, learn_opengl());
    shell.run_loop(&mut continue_frame).unwrap();

    shell.shutdown();
    assert_eq!(shell.state(), ShellState::Terminated);
    assert!(shell.platform().is_torn_down());
    assert!(shell.window().is_none());

    shell.shutdown();
    assert_eq!(shell.state(), ShellState::Terminated);
}

#[test]
fn shutdown_after_failed_initialize_releases_platform() {
    let mut shell = Shell::new(HeadlessPlatform::new().failing_at(FailAt::CreateWindow));
    assert!(shell.initialize(learn_opengl()).is_err());
    shell.shutdown();
    assert_eq!(shell.state(), ShellState::Terminated);
    assert!(shell.platform().is_torn_down());
}

#[test]
fn run_tears_down_even_when_loop_fails() {
    let platform = HeadlessPlatform::new().with_present_results([PresentStatus::Fatal("oom".into())]);
    let teardowns = platform.teardown_counter();
    let err = Shell::run(platform, learn_opengl(), &mut continue_frame).unwrap_err();
    assert!(matches!(err, ShellError::Present(_)));
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn run_tears_down_when_initialization_fails() {
    let platform = HeadlessPlatform::new().failing_at(FailAt::MakeCurrent);
    let teardowns = platform.teardown_counter();
    let err = Shell::run(platform, learn_opengl(), &mut continue_frame).unwrap_err();
    assert!(matches!(err, ShellError::GraphicsInit(_)));
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn dropping_initialized_shell_tears_down() {
    let platform = HeadlessPlatform::new();
    let teardowns = platform.teardown_counter();
    let mut shell = Shell::new(platform);
    shell.initialize(learn_opengl()).unwrap();
    assert_eq!(shell.state(), ShellState::Initialized);

    drop(shell);
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn dropping_bound_shell_tears_down() {
    let platform = HeadlessPlatform::new();
    let teardowns = platform.teardown_counter();
    let shell = ready(platform, learn_opengl());
    assert_eq!(shell.state(), ShellState::ContextCurrent);

    drop(shell);
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn dropping_shell_after_loop_tears_down_once() {
    let platform = HeadlessPlatform::new().close_after_polls(2);
    let teardowns = platform.teardown_counter();
    let mut shell = ready(platform, learn_opengl());
    shell.run_loop(&mut continue_frame).unwrap();
    assert_eq!(shell.state(), ShellState::Running);

    drop(shell);
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn explicit_shutdown_is_not_repeated_on_drop() {
    let platform = HeadlessPlatform::new();
    let teardowns = platform.teardown_counter();
    let mut shell = ready(platform, learn_opengl());
    shell.shutdown();

    drop(shell);
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn panicking_frame_callback_still_tears_down() {
    let platform = HeadlessPlatform::new().close_after_polls(10);
    let teardowns = platform.teardown_counter();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        Shell::run(platform, learn_opengl(), &mut |ctx: &mut FrameCtx<'_>| {
            if ctx.frame_index() == 2 {
                panic!("frame callback failed");
            }
            AppControl::Continue
        })
    }));

    assert!(result.is_err());
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn close_after_zero_polls_runs_a_single_frame() {
    let platform = HeadlessPlatform::new().close_after_polls(0);
    let summary = Shell::run(platform, learn_opengl(), &mut |ctx: &mut FrameCtx<'_>| {
        assert!(ctx.frame_index() < 1000, "loop did not stop");
        AppControl::Continue
    })
    .unwrap();
    assert_eq!(summary.frames, 1);
}

#[test]
fn run_reports_summary() {
    let platform = HeadlessPlatform::new().close_after_polls(10);
    let summary = Shell::run(platform, learn_opengl(), &mut continue_frame).unwrap();
    assert_eq!(summary.frames, 10);
    assert_eq!(summary.skipped_presents, 0);
    assert_eq!(summary.viewport, Viewport::full(800, 600));
}
