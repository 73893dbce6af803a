use crate::{
    foundation::core::Dpi,
    foundation::error::{FrameError, FrameResult},
    pixel::{
        PixelFormat,
        format::unpremultiply,
        lock::LockedFramebuffer,
    },
};

/// A block of row-major pixel memory with an explicit format and row stride.
///
/// The buffer exclusively owns its memory. Writes only happen through a [`LockedFramebuffer`],
/// which mutably borrows the buffer, so the memory cannot be released or moved while a lock is
/// outstanding. Releasing consumes the buffer, which makes a second release unrepresentable.
#[derive(Debug)]
pub struct PixelBuffer {
    format: PixelFormat,
    width: u32,
    height: u32,
    row_stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer with tightly packed rows.
    pub fn allocate(format: PixelFormat, width: u32, height: u32) -> FrameResult<Self> {
        let row_stride = packed_row_len(format, width).ok_or_else(|| {
            alloc_error(format, width, height, usize::MAX, "row size overflows usize")
        })?;
        Self::allocate_with_stride(format, width, height, row_stride)
    }

    /// Allocate a zero-filled buffer whose rows are `row_stride` bytes apart.
    ///
    /// `row_stride` may exceed `width * bytes_per_pixel`; the excess is per-row padding.
    pub fn allocate_with_stride(
        format: PixelFormat,
        width: u32,
        height: u32,
        row_stride: usize,
    ) -> FrameResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::validation(format!(
                "pixel buffer dimensions must be > 0, got {width}x{height}"
            )));
        }
        let min_stride = packed_row_len(format, width).ok_or_else(|| {
            alloc_error(format, width, height, usize::MAX, "row size overflows usize")
        })?;
        if row_stride < min_stride {
            return Err(FrameError::validation(format!(
                "row stride {row_stride} is smaller than packed row size {min_stride} \
                 ({width} px of {format})"
            )));
        }

        let len = row_stride.checked_mul(height as usize).ok_or_else(|| {
            alloc_error(format, width, height, usize::MAX, "buffer size overflows usize")
        })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| alloc_error(format, width, height, len, e.to_string()))?;
        data.resize(len, 0);

        tracing::debug!(%format, width, height, row_stride, bytes = len, "allocated pixel buffer");
        Ok(Self {
            format,
            width,
            height,
            row_stride,
            data,
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte distance between the starts of consecutive rows.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Bytes of pixel data in one row, excluding padding.
    pub fn packed_row_len(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Total size of the allocation: `height * row_stride`.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Acquire exclusive access at the standard 96 DPI.
    pub fn lock(&mut self) -> LockedFramebuffer<'_> {
        LockedFramebuffer::exclusive(self, Dpi::STANDARD)
    }

    /// Free the memory. Consuming `self` means this happens exactly once.
    pub fn release(self) {
        tracing::debug!(
            format = %self.format,
            width = self.width,
            height = self.height,
            bytes = self.data.len(),
            "released pixel buffer"
        );
        drop(self);
    }

    /// Logical pixels as tightly packed premultiplied RGBA8. Row padding is skipped.
    pub fn to_rgba8_premul(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        let bpp = self.format.bytes_per_pixel();
        for row in self.rows() {
            for px in row.chunks_exact(bpp) {
                out.extend_from_slice(&self.format.unpack(px));
            }
        }
        out
    }

    /// Logical pixels as tightly packed straight-alpha RGBA8, the layout image codecs expect.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        let mut out = self.to_rgba8_premul();
        for px in out.chunks_exact_mut(4) {
            let straight = unpremultiply([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&straight);
        }
        out
    }

    /// Iterate the pixel bytes of each row, padding excluded.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let packed = self.packed_row_len();
        self.data
            .chunks_exact(self.row_stride)
            .map(move |row| &row[..packed])
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

fn packed_row_len(format: PixelFormat, width: u32) -> Option<usize> {
    (width as usize).checked_mul(format.bytes_per_pixel())
}

fn alloc_error(
    format: PixelFormat,
    width: u32,
    height: u32,
    bytes: usize,
    reason: impl Into<String>,
) -> FrameError {
    FrameError::Allocation {
        width,
        height,
        format,
        bytes,
        reason: reason.into(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/buffer.rs"]
mod tests;
