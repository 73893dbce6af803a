use std::sync::Arc;

use crate::{
    foundation::error::{FrameError, FrameResult},
    pixel::{LockedFramebuffer, PixelBuffer, PixelFormat},
};

/// Immutable pixels usable as the source of a `draw_image` call.
///
/// Construction always copies: the bitmap never aliases the memory it was built from, so the
/// source buffer may be released or rewritten as soon as the constructor returns. Clones share
/// the copied pixels.
#[derive(Clone, Debug)]
pub struct Bitmap {
    width: u32,
    height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Copy `height` rows of `format` pixels spaced `row_stride` bytes apart out of `pixels`.
    pub fn from_pixels(
        format: PixelFormat,
        pixels: &[u8],
        width: u32,
        height: u32,
        row_stride: usize,
    ) -> FrameResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::validation(format!(
                "bitmap dimensions must be > 0, got {width}x{height}"
            )));
        }
        let bpp = format.bytes_per_pixel();
        let packed = width as usize * bpp;
        if row_stride < packed {
            return Err(FrameError::validation(format!(
                "row stride {row_stride} is smaller than packed row size {packed}"
            )));
        }
        let needed = (height as usize - 1)
            .checked_mul(row_stride)
            .and_then(|n| n.checked_add(packed))
            .ok_or_else(|| {
                FrameError::validation(format!(
                    "{width}x{height} {format} with stride {row_stride} overflows usize"
                ))
            })?;
        if pixels.len() < needed {
            return Err(FrameError::validation(format!(
                "{width}x{height} {format} with stride {row_stride} needs {needed} bytes, got {}",
                pixels.len()
            )));
        }

        let mut rgba8_premul = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height as usize {
            let start = y * row_stride;
            for px in pixels[start..start + packed].chunks_exact(bpp) {
                rgba8_premul.extend_from_slice(&format.unpack(px));
            }
        }

        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Snapshot a buffer's current pixels.
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            rgba8_premul: Arc::new(buffer.to_rgba8_premul()),
        }
    }

    /// Snapshot the pixels behind a lock, e.g. right after a drawing session committed.
    pub fn from_lock(lock: &LockedFramebuffer<'_>) -> Self {
        Self::from_buffer(lock.buffer())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied RGBA8 at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.rgba8_premul[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/source.rs"]
mod tests;
