use std::path::Path;

use crate::{
    bitmap::{
        Bitmap,
        codec::{self, ImageEncoding},
    },
    foundation::core::Dpi,
    foundation::error::FrameResult,
    pixel::{LockedFramebuffer, PixelBuffer, PixelFormat},
    surface::FramebufferSurface,
};

/// Something a drawing context can paint into.
///
/// The drawing context holds the target's lock for the whole session, so the pixel memory stays
/// put until the context is finished or dropped.
pub trait RenderTarget {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Lock the backing memory for a drawing session.
    fn lock_target(&mut self) -> FrameResult<LockedFramebuffer<'_>>;
}

/// Offscreen render target that owns a premultiplied `Rgba8888` buffer.
#[derive(Debug)]
pub struct RenderTargetBitmap {
    buffer: PixelBuffer,
    dpi: Dpi,
}

impl RenderTargetBitmap {
    /// Allocate a transparent target.
    pub fn new(width: u32, height: u32) -> FrameResult<Self> {
        Ok(Self {
            buffer: PixelBuffer::allocate(PixelFormat::Rgba8888, width, height)?,
            dpi: Dpi::STANDARD,
        })
    }

    pub fn with_dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Persist as PNG (or BMP when the extension says so).
    pub fn save(&self, path: impl AsRef<Path>) -> FrameResult<()> {
        let path = path.as_ref();
        codec::encode(
            &self.buffer,
            ImageEncoding::from_path(path).unwrap_or_default(),
            path,
        )
    }

    pub fn to_bitmap(&self) -> Bitmap {
        Bitmap::from_buffer(&self.buffer)
    }

    pub fn release(self) {
        self.buffer.release();
    }
}

impl RenderTarget for RenderTargetBitmap {
    fn size(&self) -> (u32, u32) {
        (self.buffer.width(), self.buffer.height())
    }

    fn lock_target(&mut self) -> FrameResult<LockedFramebuffer<'_>> {
        let dpi = self.dpi;
        Ok(self.buffer.lock().with_dpi(dpi))
    }
}

/// Render target drawing in place into memory owned by someone else.
///
/// Nothing is copied: every committed drawing session lands directly in the surface's buffer.
/// The surface's owner stays responsible for freeing that memory once this target is gone.
pub struct FramebufferRenderTarget<'s> {
    surface: &'s dyn FramebufferSurface,
}

impl<'s> FramebufferRenderTarget<'s> {
    pub fn new(surface: &'s dyn FramebufferSurface) -> Self {
        Self { surface }
    }
}

impl RenderTarget for FramebufferRenderTarget<'_> {
    fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    fn lock_target(&mut self) -> FrameResult<LockedFramebuffer<'_>> {
        self.surface.lock_framebuffer()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
