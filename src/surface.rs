//! Capabilities a pixel surface can offer to callers and to rendering backends.
//!
//! [`Lockable`] is exclusive, compile-time checked access for the owner of a surface.
//! [`SurfaceDescriptor`] is what a backend inspects when asked to build a render target; a
//! descriptor that is backed by CPU memory exposes it through [`FramebufferSurface`], which locks
//! through a shared reference and therefore checks overlapping locks at runtime.

use std::cell::RefCell;

use crate::{
    foundation::core::Dpi,
    foundation::error::{FrameError, FrameResult},
    pixel::{LockedFramebuffer, PixelBuffer, PixelFormat},
};

/// Exclusive access to pixel memory through `&mut self`.
pub trait Lockable {
    /// Lock the pixel memory; the borrow keeps the memory alive and in place until unlocked.
    fn lock(&mut self) -> FrameResult<LockedFramebuffer<'_>>;
}

/// A surface a rendering backend may be able to draw into.
pub trait SurfaceDescriptor {
    /// Short human-readable kind, used in diagnostics.
    fn describe(&self) -> String;

    /// The CPU framebuffer behind this descriptor, if it has one.
    fn as_framebuffer(&self) -> Option<&dyn FramebufferSurface> {
        None
    }
}

/// A surface whose pixels live in CPU memory the backend can write in place.
pub trait FramebufferSurface {
    /// Lock through a shared reference; fails with [`FrameError::LockState`] if already locked.
    fn lock_framebuffer(&self) -> FrameResult<LockedFramebuffer<'_>>;

    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);
}

/// Caller-owned pixel memory exposed both as a lockable buffer and as a platform surface.
pub struct Framebuffer {
    format: PixelFormat,
    width: u32,
    height: u32,
    row_stride: usize,
    buffer: RefCell<PixelBuffer>,
    dpi: Dpi,
}

impl Framebuffer {
    /// Allocate a framebuffer with tightly packed rows.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> FrameResult<Self> {
        Ok(Self::from_buffer(PixelBuffer::allocate(format, width, height)?))
    }

    /// Wrap an existing buffer, e.g. one allocated with a padded stride.
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            format: buffer.format(),
            width: buffer.width(),
            height: buffer.height(),
            row_stride: buffer.row_stride(),
            buffer: RefCell::new(buffer),
            dpi: Dpi::STANDARD,
        }
    }

    pub fn with_dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
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

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn dpi(&self) -> Dpi {
        self.dpi
    }

    /// Run `f` over the current pixels while no lock is held.
    pub fn with_pixels<T>(&self, f: impl FnOnce(&PixelBuffer) -> T) -> FrameResult<T> {
        let buffer = self
            .buffer
            .try_borrow()
            .map_err(|_| FrameError::lock_state("framebuffer is locked"))?;
        Ok(f(&buffer))
    }

    /// Take the buffer back out, e.g. to hand it to another owner.
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer.into_inner()
    }

    /// Free the pixel memory. Taking `self` by value rules out a second release and any
    /// release while a lock borrowed from this framebuffer is alive.
    pub fn deallocate(self) {
        self.buffer.into_inner().release();
    }
}

impl Lockable for Framebuffer {
    fn lock(&mut self) -> FrameResult<LockedFramebuffer<'_>> {
        let dpi = self.dpi;
        Ok(LockedFramebuffer::exclusive(self.buffer.get_mut(), dpi))
    }
}

impl FramebufferSurface for Framebuffer {
    fn lock_framebuffer(&self) -> FrameResult<LockedFramebuffer<'_>> {
        let buffer = self.buffer.try_borrow_mut().map_err(|_| {
            FrameError::lock_state("framebuffer is already locked; unlock it before locking again")
        })?;
        Ok(LockedFramebuffer::shared(buffer, self.dpi))
    }

    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl SurfaceDescriptor for Framebuffer {
    fn describe(&self) -> String {
        format!("framebuffer {}x{} {}", self.width(), self.height(), self.format())
    }

    fn as_framebuffer(&self) -> Option<&dyn FramebufferSurface> {
        Some(self)
    }
}

impl Lockable for PixelBuffer {
    fn lock(&mut self) -> FrameResult<LockedFramebuffer<'_>> {
        Ok(PixelBuffer::lock(self))
    }
}

/// A presentable surface that is not CPU-addressable, such as a native window handle.
///
/// Render targets cannot be built over it by the CPU backend.
#[derive(Clone, Debug)]
pub struct NativeWindowSurface {
    pub handle: u64,
    pub kind: &'static str,
}

impl SurfaceDescriptor for NativeWindowSurface {
    fn describe(&self) -> String {
        format!("{} window 0x{:x}", self.kind, self.handle)
    }
}

#[cfg(test)]
#[path = "../tests/unit/surface/framebuffer.rs"]
mod tests;
