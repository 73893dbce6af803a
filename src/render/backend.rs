use crate::{
    foundation::core::Dpi,
    foundation::error::{FrameError, FrameResult},
    render::{
        context::{CpuDrawingContext, DrawingContext},
        target::{FramebufferRenderTarget, RenderTarget, RenderTargetBitmap},
    },
    surface::SurfaceDescriptor,
};

/// A rendering backend: builds render targets and drawing contexts over them.
///
/// Backends are passed explicitly to whoever needs one; there is no process-wide registry.
pub trait RenderBackend {
    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Build a render target over the first descriptor this backend can draw into in place.
    fn create_render_target<'s>(
        &self,
        surfaces: &[&'s dyn SurfaceDescriptor],
    ) -> FrameResult<FramebufferRenderTarget<'s>>;

    /// Allocate an offscreen target of `width` x `height` pixels.
    fn create_render_target_bitmap(
        &self,
        width: u32,
        height: u32,
    ) -> FrameResult<RenderTargetBitmap>;

    /// Lock `target` and open a drawing session over it.
    fn create_drawing_context<'t>(
        &self,
        target: &'t mut dyn RenderTarget,
    ) -> FrameResult<Box<dyn DrawingContext + 't>>;
}

/// CPU backend options.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackendOpts {
    /// DPI given to offscreen targets this backend allocates.
    pub dpi: Dpi,
}

/// Software rasterizer backend built on `vello_cpu`.
#[derive(Clone, Debug, Default)]
pub struct CpuBackend {
    opts: CpuBackendOpts,
}

impl CpuBackend {
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self { opts }
    }
}

impl RenderBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn create_render_target<'s>(
        &self,
        surfaces: &[&'s dyn SurfaceDescriptor],
    ) -> FrameResult<FramebufferRenderTarget<'s>> {
        for &descriptor in surfaces {
            if let Some(fb) = descriptor.as_framebuffer() {
                tracing::debug!(surface = %descriptor.describe(), "render target over framebuffer");
                return Ok(FramebufferRenderTarget::new(fb));
            }
        }
        Err(FrameError::UnsupportedSurface {
            offered: surfaces.iter().map(|s| s.describe()).collect(),
        })
    }

    fn create_render_target_bitmap(
        &self,
        width: u32,
        height: u32,
    ) -> FrameResult<RenderTargetBitmap> {
        Ok(RenderTargetBitmap::new(width, height)?.with_dpi(self.opts.dpi))
    }

    fn create_drawing_context<'t>(
        &self,
        target: &'t mut dyn RenderTarget,
    ) -> FrameResult<Box<dyn DrawingContext + 't>> {
        let lock = target.lock_target()?;
        Ok(Box::new(CpuDrawingContext::new(lock)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
