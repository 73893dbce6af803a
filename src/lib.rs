//! framecheck: CPU-addressable framebuffers, writable bitmaps and a golden-image regression
//! harness for a software 2D renderer.
//!
//! - Allocate a [`PixelBuffer`] or a [`Framebuffer`] and lock it to read or write pixels
//! - Hand surfaces to a [`RenderBackend`] to draw into them with a [`DrawingContext`]
//! - Run the scenario table with a [`ScenarioRunner`] and compare outputs against references
#![forbid(unsafe_code)]

mod foundation;

pub mod bitmap;
pub mod harness;
pub mod pixel;
pub mod render;
pub mod surface;

pub use crate::foundation::core::{Affine, Color, Dpi, Point, Rect, Size, surface_rect};
pub use crate::foundation::error::{FrameError, FrameResult};

pub use crate::bitmap::{Bitmap, ImageEncoding, WritableBitmap};
pub use crate::harness::{
    ComparisonReport, HarnessOpts, Scenario, ScenarioCase, ScenarioOutcome, ScenarioRunner,
    Tolerance, compare_images, scenario_table,
};
pub use crate::pixel::{LockedFramebuffer, PixelBuffer, PixelFormat};
pub use crate::render::{
    CpuBackend, CpuBackendOpts, DrawingContext, FramebufferRenderTarget, RenderBackend,
    RenderTarget, RenderTargetBitmap,
};
pub use crate::surface::{
    Framebuffer, FramebufferSurface, Lockable, NativeWindowSurface, SurfaceDescriptor,
};
