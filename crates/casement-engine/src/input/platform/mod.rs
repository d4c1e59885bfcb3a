//! Native event translation, one submodule per windowing backend.

pub(crate) mod winit;
