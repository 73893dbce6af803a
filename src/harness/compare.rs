use std::path::Path;

use crate::{
    bitmap::codec,
    foundation::error::{FrameError, FrameResult},
    pixel::PixelFormat,
};

/// How far an actual image may drift from its reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Largest allowed absolute difference on any single channel of any pixel.
    pub max_channel_diff: u8,
    /// Largest allowed mean absolute difference over every channel of every pixel.
    pub max_mean_diff: f64,
}

impl Tolerance {
    pub const EXACT: Tolerance = Tolerance {
        max_channel_diff: 0,
        max_mean_diff: 0.0,
    };

    /// Exact for 32-bit formats; wide enough for channel quantization otherwise.
    pub fn for_format(format: PixelFormat) -> Self {
        let q = format.quantization_error();
        Self {
            max_channel_diff: q,
            max_mean_diff: f64::from(q),
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::EXACT
    }
}

/// Per-channel difference statistics between two equally sized images.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    pub width: u32,
    pub height: u32,
    pub max_channel_diff: u8,
    pub mean_abs_diff: f64,
    /// Pixels with at least one channel over the tolerance's per-channel limit.
    pub mismatched_pixels: u64,
    /// First pixel (row-major) over the per-channel limit.
    pub first_mismatch: Option<(u32, u32)>,
    /// First pixel (row-major) that differs at all.
    pub first_difference: Option<(u32, u32)>,
    /// Tolerance the counts above were measured against.
    pub tolerance: Tolerance,
}

impl ComparisonReport {
    pub fn passes(&self) -> bool {
        self.mismatched_pixels == 0 && self.mean_abs_diff <= self.tolerance.max_mean_diff
    }

    pub fn is_identical(&self) -> bool {
        self.max_channel_diff == 0
    }

    /// `Ok(self)` within the measured tolerance, [`FrameError::PixelMismatch`] otherwise.
    pub fn check(self) -> FrameResult<Self> {
        if self.passes() {
            return Ok(self);
        }
        Err(FrameError::PixelMismatch {
            max_channel_diff: self.max_channel_diff,
            mean_abs_diff: self.mean_abs_diff,
            mismatched_pixels: self.mismatched_pixels,
            first_mismatch: self
                .first_mismatch
                .or(self.first_difference)
                .unwrap_or((0, 0)),
        })
    }
}

/// Diff two straight-alpha RGBA8 images. Fails only on a size mismatch.
pub fn diff_images(
    actual: &image::RgbaImage,
    reference: &image::RgbaImage,
    tolerance: Tolerance,
) -> FrameResult<ComparisonReport> {
    if actual.dimensions() != reference.dimensions() {
        return Err(FrameError::DimensionMismatch {
            actual: actual.dimensions(),
            reference: reference.dimensions(),
        });
    }
    let (width, height) = actual.dimensions();

    let mut max_channel_diff = 0u8;
    let mut sum = 0u64;
    let mut mismatched_pixels = 0u64;
    let mut first_mismatch = None;
    let mut first_difference = None;

    for (x, y, a) in actual.enumerate_pixels() {
        let r = reference.get_pixel(x, y);
        let mut px_max = 0u8;
        for (p, q) in a.0.iter().zip(r.0.iter()) {
            let d = p.abs_diff(*q);
            sum += u64::from(d);
            px_max = px_max.max(d);
        }

        max_channel_diff = max_channel_diff.max(px_max);
        if px_max > 0 && first_difference.is_none() {
            first_difference = Some((x, y));
        }
        if px_max > tolerance.max_channel_diff {
            mismatched_pixels += 1;
            first_mismatch.get_or_insert((x, y));
        }
    }

    let channels = u64::from(width) * u64::from(height) * 4;
    Ok(ComparisonReport {
        width,
        height,
        max_channel_diff,
        mean_abs_diff: sum as f64 / channels as f64,
        mismatched_pixels,
        first_mismatch,
        first_difference,
        tolerance,
    })
}

/// Load the persisted output, then the reference, and require them to agree within `tolerance`.
///
/// A reference that does not exist is [`FrameError::ReferenceMissing`], never a pixel mismatch.
#[tracing::instrument(skip(tolerance))]
pub fn compare_images(
    actual_path: &Path,
    reference_path: &Path,
    tolerance: Tolerance,
) -> FrameResult<ComparisonReport> {
    let actual = codec::decode_rgba8(actual_path)?;
    if !reference_path.exists() {
        return Err(FrameError::ReferenceMissing {
            path: reference_path.to_path_buf(),
        });
    }
    let reference = codec::decode_rgba8(reference_path)?;

    let report = diff_images(&actual, &reference, tolerance)?.check()?;
    if !report.is_identical() {
        tracing::warn!(
            max_channel_diff = report.max_channel_diff,
            mean_abs_diff = report.mean_abs_diff,
            "images differ within tolerance"
        );
    }
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/harness/compare.rs"]
mod tests;
