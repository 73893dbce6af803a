pub mod backend;
pub mod composite;
pub mod context;
pub mod target;

pub use backend::{CpuBackend, CpuBackendOpts, RenderBackend};
pub use context::{CpuDrawingContext, DrawingContext};
pub use target::{FramebufferRenderTarget, RenderTarget, RenderTargetBitmap};
