//! GPU rendering subsystem.
//!
//! The renderer consumes `plot` geometry buffers and issues GPU commands via
//! wgpu. It owns its GPU resources (pipeline, vertex buffers).
//!
//! Convention:
//! - CPU geometry is already in NDC; the vertex shader is a passthrough.
//! - Buffer contents are uploaded only when the caller says they changed.

mod ctx;
mod line;

pub use ctx::{RenderCtx, RenderTarget};
pub use line::{GpuGeometry, LineRenderer};
