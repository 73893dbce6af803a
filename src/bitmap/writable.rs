use std::path::Path;

use crate::{
    bitmap::{
        Bitmap,
        codec::{self, ImageEncoding},
    },
    foundation::core::Dpi,
    foundation::error::FrameResult,
    pixel::{LockedFramebuffer, PixelBuffer, PixelFormat},
    surface::Lockable,
};

/// A bitmap whose pixels callers poke directly through repeated lock sessions.
#[derive(Debug)]
pub struct WritableBitmap {
    buffer: PixelBuffer,
    dpi: Dpi,
}

impl WritableBitmap {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> FrameResult<Self> {
        Ok(Self {
            buffer: PixelBuffer::allocate(format, width, height)?,
            dpi: Dpi::STANDARD,
        })
    }

    /// Build over a caller-prepared buffer, e.g. one with padded rows.
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            dpi: Dpi::STANDARD,
        }
    }

    pub fn with_dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn format(&self) -> PixelFormat {
        self.buffer.format()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Persist the current pixels. The container follows the file extension, PNG otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> FrameResult<()> {
        let path = path.as_ref();
        self.save_as(path, ImageEncoding::from_path(path).unwrap_or_default())
    }

    pub fn save_as(&self, path: impl AsRef<Path>, encoding: ImageEncoding) -> FrameResult<()> {
        codec::encode(&self.buffer, encoding, path.as_ref())
    }

    /// Copy of the current pixels usable as a paint source.
    pub fn to_bitmap(&self) -> Bitmap {
        Bitmap::from_buffer(&self.buffer)
    }

    /// Release the backing buffer.
    pub fn release(self) {
        self.buffer.release();
    }
}

impl Lockable for WritableBitmap {
    fn lock(&mut self) -> FrameResult<LockedFramebuffer<'_>> {
        Ok(self.buffer.lock().with_dpi(self.dpi))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/writable.rs"]
mod tests;
