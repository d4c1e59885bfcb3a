//! wgpu device + surface management.
//!
//! Two phases, matching the shell lifecycle:
//! - `GpuSurface`: instance, window surface and adapter, created with the
//!   window and checked against the requested graphics hints
//! - `Gpu`: device, queue and surface configuration, created when the
//!   context is made current; implements `GraphicsContext`

mod error;
mod frame;
mod gpu;
mod hints;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::{Gpu, GpuSurface};
pub use init::GpuInit;
