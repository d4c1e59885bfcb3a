//! Desktop windowing backend.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the wgpu layer.

mod platform;

pub use platform::WinitPlatform;
