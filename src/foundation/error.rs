use std::path::PathBuf;

use crate::pixel::PixelFormat;

/// Convenience result type used across framecheck.
pub type FrameResult<T> = Result<T, FrameError>;

/// Error taxonomy shared by buffers, render targets, codecs and the comparison harness.
///
/// None of these are retried: rendering and comparison are deterministic, so every error is
/// either a real regression or a harness defect.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// Backing pixel memory could not be obtained.
    #[error("allocation error: {bytes} bytes for {width}x{height} {format}: {reason}")]
    Allocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Requested pixel format.
        format: PixelFormat,
        /// Requested byte size, saturated when the computation overflowed.
        bytes: usize,
        /// Allocator or overflow detail.
        reason: String,
    },

    /// No surface descriptor handed to the backend could be drawn into.
    #[error("unsupported surface: none of [{}] is a framebuffer surface", .offered.join(", "))]
    UnsupportedSurface {
        /// Names of the descriptors that were offered.
        offered: Vec<String>,
    },

    /// Overlapping lock, or unlock/release without a matching lock.
    #[error("lock state error: {0}")]
    LockState(String),

    /// Invalid dimensions, strides, coordinates or rectangles.
    #[error("validation error: {0}")]
    Validation(String),

    /// Misuse of a drawing context.
    #[error("drawing error: {0}")]
    Drawing(String),

    /// Persisting pixels to an image file failed.
    #[error("encoding error: {}: {source}", .path.display())]
    Encoding {
        /// Destination path.
        path: PathBuf,
        /// Underlying codec or IO failure.
        #[source]
        source: image::ImageError,
    },

    /// Loading an image file failed.
    #[error("decoding error: {}: {source}", .path.display())]
    Decoding {
        /// Source path.
        path: PathBuf,
        /// Underlying codec or IO failure.
        #[source]
        source: image::ImageError,
    },

    /// Actual and reference images differ in size.
    #[error(
        "dimension mismatch: actual {}x{} vs reference {}x{}",
        .actual.0, .actual.1, .reference.0, .reference.1
    )]
    DimensionMismatch {
        /// Actual image size `(width, height)`.
        actual: (u32, u32),
        /// Reference image size `(width, height)`.
        reference: (u32, u32),
    },

    /// The golden image does not exist; the harness is misconfigured or the scenario is new.
    #[error("reference missing: {}", .path.display())]
    ReferenceMissing {
        /// Expected reference path.
        path: PathBuf,
    },

    /// Rendered pixels differ from the reference beyond tolerance.
    #[error(
        "pixel mismatch: {mismatched_pixels} pixels differ, max channel diff {max_channel_diff}, \
         mean abs diff {mean_abs_diff:.4}, first at ({}, {})",
        .first_mismatch.0, .first_mismatch.1
    )]
    PixelMismatch {
        /// Largest absolute difference seen on any channel.
        max_channel_diff: u8,
        /// Mean absolute difference over all channels of all pixels.
        mean_abs_diff: f64,
        /// Number of pixels with at least one channel over the per-channel limit.
        mismatched_pixels: u64,
        /// First mismatching coordinate in row-major order.
        first_mismatch: (u32, u32),
    },

    /// Any error raised while running a scenario, tagged with where it happened.
    #[error("scenario {name} [{format}] failed: {source}")]
    Scenario {
        /// Scenario name.
        name: String,
        /// Pixel format the scenario ran with.
        format: PixelFormat,
        /// The error that stopped the scenario.
        #[source]
        source: Box<FrameError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameError {
    /// Build a [`FrameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameError::Drawing`] value.
    pub fn drawing(msg: impl Into<String>) -> Self {
        Self::Drawing(msg.into())
    }

    /// Build a [`FrameError::LockState`] value.
    pub fn lock_state(msg: impl Into<String>) -> Self {
        Self::LockState(msg.into())
    }

    /// Tag `self` with the scenario it escaped from.
    pub fn in_scenario(self, name: impl Into<String>, format: PixelFormat) -> Self {
        Self::Scenario {
            name: name.into(),
            format,
            source: Box::new(self),
        }
    }

    /// Strip any [`FrameError::Scenario`] wrappers.
    pub fn root(&self) -> &FrameError {
        match self {
            Self::Scenario { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
