//! Small value types shared by the shell and its graphics backends.
//!
//! Viewports are in physical framebuffer pixels with the origin at the
//! lower-left corner, the way a graphics context addresses them.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
