//! Core GPU plumbing shared by the renderers.

pub mod gpu;
pub(crate) mod pass;

pub use gpu::GpuContext;
pub use pass::ClearColor;
