use std::{
    cell::RefMut,
    ops::{Deref, DerefMut},
};

use crate::{
    foundation::core::Dpi,
    foundation::error::{FrameError, FrameResult},
    pixel::{PixelBuffer, PixelFormat},
};

enum Access<'a> {
    Exclusive(&'a mut PixelBuffer),
    Shared(RefMut<'a, PixelBuffer>),
}

impl Deref for Access<'_> {
    type Target = PixelBuffer;

    fn deref(&self) -> &PixelBuffer {
        match self {
            Access::Exclusive(b) => b,
            Access::Shared(b) => b,
        }
    }
}

impl DerefMut for Access<'_> {
    fn deref_mut(&mut self) -> &mut PixelBuffer {
        match self {
            Access::Exclusive(b) => b,
            Access::Shared(b) => b,
        }
    }
}

/// Time-bounded exclusive access to a [`PixelBuffer`].
///
/// Pixel `(x, y)` lives at byte offset `y * row_stride + x * bytes_per_pixel`. Bytes past
/// `width * bytes_per_pixel` in a row are padding; the accessors here never hand them out as
/// pixels. Dropping the handle (or calling [`LockedFramebuffer::unlock`]) ends the access window
/// without freeing anything.
pub struct LockedFramebuffer<'a> {
    buffer: Access<'a>,
    dpi: Dpi,
}

impl<'a> LockedFramebuffer<'a> {
    pub(crate) fn exclusive(buffer: &'a mut PixelBuffer, dpi: Dpi) -> Self {
        tracing::trace!(width = buffer.width(), height = buffer.height(), "lock");
        Self {
            buffer: Access::Exclusive(buffer),
            dpi,
        }
    }

    pub(crate) fn shared(buffer: RefMut<'a, PixelBuffer>, dpi: Dpi) -> Self {
        tracing::trace!(width = buffer.width(), height = buffer.height(), "lock (shared)");
        Self {
            buffer: Access::Shared(buffer),
            dpi,
        }
    }

    /// Override the DPI reported to the renderer.
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

    pub fn row_stride(&self) -> usize {
        self.buffer.row_stride()
    }

    pub fn format(&self) -> PixelFormat {
        self.buffer.format()
    }

    pub fn dpi(&self) -> Dpi {
        self.dpi
    }

    /// Read-only view of the locked buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// The whole allocation, padding included: `height * row_stride` bytes.
    pub fn data(&self) -> &[u8] {
        self.buffer.bytes()
    }

    /// Mutable view of the whole allocation, padding included.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.buffer.bytes_mut()
    }

    /// Byte offset of pixel `(x, y)` from the start of the buffer.
    pub fn pixel_offset(&self, x: u32, y: u32) -> FrameResult<usize> {
        if x >= self.width() || y >= self.height() {
            return Err(FrameError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.width(),
                self.height()
            )));
        }
        Ok(y as usize * self.row_stride() + x as usize * self.format().bytes_per_pixel())
    }

    /// Pixel bytes of row `y`, padding excluded.
    pub fn row(&self, y: u32) -> FrameResult<&[u8]> {
        let range = self.row_range(y)?;
        Ok(&self.buffer.bytes()[range])
    }

    /// Mutable pixel bytes of row `y`, padding excluded.
    pub fn row_mut(&mut self, y: u32) -> FrameResult<&mut [u8]> {
        let range = self.row_range(y)?;
        Ok(&mut self.buffer.bytes_mut()[range])
    }

    /// Raw stored value of pixel `(x, y)`, zero-extended for 16-bit formats.
    pub fn read_pixel(&self, x: u32, y: u32) -> FrameResult<u32> {
        let off = self.pixel_offset(x, y)?;
        let format = self.format();
        Ok(format.read_raw(&self.data()[off..off + format.bytes_per_pixel()]))
    }

    /// Store a raw value at `(x, y)`; bits above the pixel width are dropped.
    pub fn write_pixel(&mut self, x: u32, y: u32, value: u32) -> FrameResult<()> {
        let off = self.pixel_offset(x, y)?;
        let format = self.format();
        format.write_raw(value, &mut self.data_mut()[off..off + format.bytes_per_pixel()]);
        Ok(())
    }

    /// Pixel `(x, y)` as premultiplied RGBA8.
    pub fn read_rgba8(&self, x: u32, y: u32) -> FrameResult<[u8; 4]> {
        let off = self.pixel_offset(x, y)?;
        let format = self.format();
        Ok(format.unpack(&self.data()[off..off + format.bytes_per_pixel()]))
    }

    /// Store premultiplied RGBA8 at `(x, y)`, converting to the buffer's format.
    pub fn write_rgba8(&mut self, x: u32, y: u32, premul: [u8; 4]) -> FrameResult<()> {
        let off = self.pixel_offset(x, y)?;
        let format = self.format();
        format.pack(premul, &mut self.data_mut()[off..off + format.bytes_per_pixel()]);
        Ok(())
    }

    /// Copy one row of raw pixel values into row `y`, starting at column 0.
    ///
    /// Rows are addressed with the buffer's stride, never `width * bytes_per_pixel`.
    pub fn write_row(&mut self, y: u32, values: &[u32]) -> FrameResult<()> {
        let width = self.width() as usize;
        if values.len() > width {
            return Err(FrameError::validation(format!(
                "row of {} values does not fit width {width}",
                values.len()
            )));
        }
        let format = self.format();
        let bpp = format.bytes_per_pixel();
        let row = self.row_mut(y)?;
        for (px, &v) in row.chunks_exact_mut(bpp).zip(values) {
            format.write_raw(v, px);
        }
        Ok(())
    }

    /// Fill the half-open pixel rectangle `[x0, x1) x [y0, y1)`, clipped to the buffer.
    pub fn fill_rgba8(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, premul: [u8; 4]) {
        let x1 = x1.min(self.width());
        let y1 = y1.min(self.height());
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let format = self.format();
        let bpp = format.bytes_per_pixel();
        let mut encoded = [0u8; 4];
        format.pack(premul, &mut encoded);

        let stride = self.row_stride();
        let data = self.data_mut();
        for y in y0..y1 {
            let start = y as usize * stride + x0 as usize * bpp;
            let end = y as usize * stride + x1 as usize * bpp;
            for px in data[start..end].chunks_exact_mut(bpp) {
                px.copy_from_slice(&encoded[..bpp]);
            }
        }
    }

    /// Logical pixels as tightly packed premultiplied RGBA8.
    pub fn to_rgba8_premul(&self) -> Vec<u8> {
        self.buffer.to_rgba8_premul()
    }

    /// Overwrite every logical pixel from tightly packed premultiplied RGBA8.
    ///
    /// Padding bytes are left untouched.
    pub fn copy_from_rgba8_premul(&mut self, rgba: &[u8]) -> FrameResult<()> {
        let (w, h) = (self.width() as usize, self.height() as usize);
        if rgba.len() != w * h * 4 {
            return Err(FrameError::validation(format!(
                "expected {} rgba8 bytes for {w}x{h}, got {}",
                w * h * 4,
                rgba.len()
            )));
        }
        let format = self.format();
        let bpp = format.bytes_per_pixel();
        let stride = self.row_stride();
        let packed = w * bpp;
        let data = self.data_mut();
        for (row, src) in data.chunks_exact_mut(stride).zip(rgba.chunks_exact(w * 4)) {
            for (px, s) in row[..packed].chunks_exact_mut(bpp).zip(src.chunks_exact(4)) {
                format.pack([s[0], s[1], s[2], s[3]], px);
            }
        }
        Ok(())
    }

    /// End the access window. Equivalent to dropping the handle.
    pub fn unlock(self) {}

    fn row_range(&self, y: u32) -> FrameResult<std::ops::Range<usize>> {
        if y >= self.height() {
            return Err(FrameError::validation(format!(
                "row {y} outside buffer of height {}",
                self.height()
            )));
        }
        let start = y as usize * self.row_stride();
        Ok(start..start + self.buffer.packed_row_len())
    }
}

impl Drop for LockedFramebuffer<'_> {
    fn drop(&mut self) {
        tracing::trace!(width = self.width(), height = self.height(), "unlock");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/lock.rs"]
mod tests;
